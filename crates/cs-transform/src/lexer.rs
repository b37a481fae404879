//! Byte-level span scanners shared by the protector and the family scanners.
//!
//! Every function takes the index of an opening delimiter and returns the
//! index one past the end of the literal. All delimiters are ASCII, so the
//! returned indices always fall on UTF-8 character boundaries.

/// Scan a `'` or `"` literal starting at `start`.
///
/// A backslash always consumes the next byte with it. When
/// `stop_at_newline` is set, an unescaped newline ends the literal without
/// being consumed (unterminated single-line string).
pub fn skip_quoted(b: &[u8], start: usize, stop_at_newline: bool) -> usize {
    let quote = b[start];
    let mut i = start + 1;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 2,
            b'\n' if stop_at_newline => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    b.len()
}

/// Scan a quoted literal whose quote is escaped by doubling (`'it''s'`).
/// Newlines are allowed inside.
pub fn skip_doubled(b: &[u8], start: usize) -> usize {
    let quote = b[start];
    let mut i = start + 1;
    while i < b.len() {
        if b[i] == quote {
            if b.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    b.len()
}

/// Scan a backtick template literal, following `${ ... }` interpolations
/// so a nested template's closing backtick is not taken as ours.
pub fn skip_template(b: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            b'$' if b.get(i + 1) == Some(&b'{') => i = skip_interpolation(b, i + 1),
            _ => i += 1,
        }
    }
    b.len()
}

/// Scan from the `{` of an interpolation to one past its matching `}`.
fn skip_interpolation(b: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < b.len() {
        match b[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return i;
                }
            }
            b'`' => i = skip_template(b, i),
            b'\'' | b'"' => i = skip_quoted(b, i, true),
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    b.len()
}

/// Whether a triple quote (`'''` or `"""`) starts at `i`.
pub fn is_triple(b: &[u8], i: usize) -> bool {
    let q = b[i];
    (q == b'\'' || q == b'"') && b.get(i + 1) == Some(&q) && b.get(i + 2) == Some(&q)
}

/// Scan a triple-quoted literal starting at `start`.
pub fn skip_triple(b: &[u8], start: usize) -> usize {
    let q = b[start];
    let mut i = start + 3;
    while i < b.len() {
        if b[i] == b'\\' {
            i += 2;
            continue;
        }
        if b[i] == q && b.get(i + 1) == Some(&q) && b.get(i + 2) == Some(&q) {
            return i + 3;
        }
        i += 1;
    }
    b.len()
}

/// If a Lua long bracket `[`, `=`*, `[` opens at `i`, return its level
/// (the number of `=` signs).
pub fn long_bracket_level(b: &[u8], i: usize) -> Option<usize> {
    if b.get(i) != Some(&b'[') {
        return None;
    }
    let mut j = i + 1;
    while b.get(j) == Some(&b'=') {
        j += 1;
    }
    (b.get(j) == Some(&b'[')).then_some(j - i - 1)
}

/// Scan a long bracket opening at `start` with the given level. Only a
/// closing `]`, `=`*level, `]` with exactly the same level ends it.
pub fn skip_long_bracket(b: &[u8], start: usize, level: usize) -> usize {
    let mut i = start + level + 2;
    while i < b.len() {
        if b[i] == b']' {
            let mut j = i + 1;
            while b.get(j) == Some(&b'=') {
                j += 1;
            }
            if j - i - 1 == level && b.get(j) == Some(&b']') {
                return j + 1;
            }
            // The second `]` may open another candidate.
            i = if j > i + 1 { j } else { i + 1 };
            continue;
        }
        i += 1;
    }
    b.len()
}

/// Index one past the end of `needle` searching from `from`, or the end of
/// input when absent.
pub fn skip_past(b: &[u8], from: usize, needle: &[u8]) -> usize {
    b[from.min(b.len())..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p + needle.len())
        .unwrap_or(b.len())
}

/// Index of the line break at or after `from` (the `\r` of a `\r\n`), or
/// the end of input.
pub fn line_end(b: &[u8], from: usize) -> usize {
    let from = from.min(b.len());
    match b[from..].iter().position(|&c| c == b'\n') {
        Some(p) if p > 0 && b[from + p - 1] == b'\r' => from + p - 1,
        Some(p) => from + p,
        None => b.len(),
    }
}

/// End of a Rust raw string `r#*"..."#*` (or `br"..."`) whose `r` is at
/// `i`, if one starts there.
pub fn raw_string_end(b: &[u8], i: usize) -> Option<usize> {
    if i > 0 && is_ident(b[i - 1]) && b[i - 1] != b'b' {
        return None;
    }
    if i > 1 && b[i - 1] == b'b' && is_ident(b[i - 2]) {
        return None;
    }
    let mut j = i + 1;
    while b.get(j) == Some(&b'#') {
        j += 1;
    }
    if b.get(j) != Some(&b'"') {
        return None;
    }
    let hashes = j - i - 1;
    let mut k = j + 1;
    while k < b.len() {
        if b[k] == b'"' && b[k + 1..].iter().take(hashes).filter(|&&c| c == b'#').count() == hashes {
            return Some(k + 1 + hashes);
        }
        k += 1;
    }
    Some(b.len())
}

/// Bytes after which a `/` opens a regex rather than dividing.
const REGEX_PREFIX_PUNCT: &[u8] = b"=(,:[!&|?;{}";
const REGEX_PREFIX_KEYWORDS: &[&[u8]] = &[
    b"return", b"typeof", b"void", b"delete", b"new", b"case", b"throw",
];

/// Whether a `/` following `prefix` opens a regex literal: the last
/// significant byte is an operator, or the last word is a keyword.
pub fn regex_allowed(prefix: &[u8]) -> bool {
    let end = match prefix.iter().rposition(|c| !c.is_ascii_whitespace()) {
        Some(p) => p + 1,
        None => return true,
    };
    let last = prefix[end - 1];
    if REGEX_PREFIX_PUNCT.contains(&last) {
        return true;
    }
    if !is_ident(last) {
        return false;
    }
    let start = prefix[..end].iter().rposition(|&c| !is_ident(c)).map_or(0, |p| p + 1);
    REGEX_PREFIX_KEYWORDS.contains(&&prefix[start..end])
}

/// End of a regex literal (flags included) starting at the `/` at `i`.
/// `None` when the line ends first, or when the `/` opens a comment, in
/// which case it is not a regex.
pub fn regex_end(b: &[u8], i: usize) -> Option<usize> {
    if matches!(b.get(i + 1), Some(b'/' | b'*')) {
        return None;
    }
    let mut j = i + 1;
    let mut in_class = false;
    while j < b.len() {
        match b[j] {
            b'\\' => j += 2,
            b'\n' => return None,
            b'[' => {
                in_class = true;
                j += 1;
            }
            b']' => {
                in_class = false;
                j += 1;
            }
            b'/' if !in_class => {
                j += 1;
                while j < b.len() && b[j].is_ascii_alphabetic() {
                    j += 1;
                }
                return Some(j);
            }
            _ => j += 1,
        }
    }
    None
}

/// `'a`, `'static`, `'outer:` are lifetimes or labels; `'a'`, `'\n'` are
/// char literals.
pub fn is_lifetime(b: &[u8], i: usize) -> bool {
    match b.get(i + 1) {
        Some(&c) if c != b'\\' && is_ident(c) => b.get(i + 1 + utf8_width(c)) != Some(&b'\''),
        _ => false,
    }
}

pub fn is_ident(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80
}

/// Byte length of the UTF-8 character whose first byte is `lead`.
pub fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted() {
        let b = br#""a\"b" rest"#;
        assert_eq!(skip_quoted(b, 0, true), 6);
        let b = b"'abc\ndef'";
        assert_eq!(skip_quoted(b, 0, true), 4);
        assert_eq!(skip_quoted(b, 0, false), 9);
    }

    #[test]
    fn test_doubled() {
        let b = b"'it''s' x";
        assert_eq!(skip_doubled(b, 0), 7);
    }

    #[test]
    fn test_template_nested() {
        let src = "`a ${ f(`inner ${x}`) } b` tail";
        let end = skip_template(src.as_bytes(), 0);
        assert_eq!(&src[..end], "`a ${ f(`inner ${x}`) } b`");
    }

    #[test]
    fn test_template_brace_in_string() {
        let src = "`${ \"}\" }` x";
        let end = skip_template(src.as_bytes(), 0);
        assert_eq!(&src[..end], "`${ \"}\" }`");
    }

    #[test]
    fn test_long_bracket_levels() {
        let src = "[==[ a ]] ]=] ]==] after";
        let b = src.as_bytes();
        assert_eq!(long_bracket_level(b, 0), Some(2));
        let end = skip_long_bracket(b, 0, 2);
        assert_eq!(&src[..end], "[==[ a ]] ]=] ]==]");
        assert_eq!(long_bracket_level(b"[x", 0), None);
    }

    #[test]
    fn test_line_end_crlf() {
        assert_eq!(line_end(b"ab\r\ncd", 0), 2);
        assert_eq!(line_end(b"ab\ncd", 0), 2);
        assert_eq!(line_end(b"\r\n", 0), 0);
        assert_eq!(line_end(b"abc", 1), 3);
    }

    #[test]
    fn test_lifetimes() {
        assert!(is_lifetime(b"&'a str", 1));
        assert!(is_lifetime(b"'static", 0));
        assert!(!is_lifetime(b"'a'", 0));
        assert!(!is_lifetime(b"'\\n'", 0));
        assert!(!is_lifetime("'é'".as_bytes(), 0));
    }

    #[test]
    fn test_raw_strings() {
        let src = r###"let s = r#"a "quoted" b"#; x"###;
        let end = raw_string_end(src.as_bytes(), 8).unwrap();
        assert_eq!(&src[8..end], r###"r#"a "quoted" b"#"###);
        assert_eq!(raw_string_end(b"br\"x\"", 1), Some(5));
        assert_eq!(raw_string_end(b"for x", 2), None);
        assert_eq!(raw_string_end(b"r + 1", 0), None);
    }

    #[test]
    fn test_regex_context() {
        assert!(regex_allowed(b"x = "));
        assert!(regex_allowed(b"return"));
        assert!(regex_allowed(b""));
        assert!(!regex_allowed(b"a "));
        assert!(!regex_allowed(b"f(x)"));
        assert_eq!(regex_end(b"/[/]x/g;", 0), Some(7));
        assert_eq!(regex_end(b"/`/g", 0), Some(4));
        assert_eq!(regex_end(b"/ 2\n/", 0), None);
        assert_eq!(regex_end(b"// c", 0), None);
    }

    #[test]
    fn test_skip_past_missing() {
        assert_eq!(skip_past(b"abc", 0, b"*/"), 3);
        assert_eq!(skip_past(b"a*/b", 0, b"*/"), 3);
    }
}
