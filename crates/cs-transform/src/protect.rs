//! Literal protector: swap every literal for an opaque placeholder so
//! whitespace and comment patterns can never match inside one.

use crate::lexer;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const PLACEHOLDER_PREFIX: &str = "\0STR";
const PLACEHOLDER_SUFFIX: &str = "END\0";

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x00STR(\d+)END\x00").unwrap());

/// Which literal forms to recognise beyond single and double quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralSyntax {
    /// Backtick templates with `${}` interpolation.
    pub backticks: bool,
    /// `'''` and `"""`, which may span lines.
    pub triple_quotes: bool,
    /// Lua `[=[ ... ]=]`.
    pub long_brackets: bool,
    /// A `'` that opens a Rust lifetime is not a literal.
    pub lifetimes: bool,
    /// Rust `r#"..."#` raw strings.
    pub raw_strings: bool,
    /// JavaScript `/.../flags` after an operator or keyword.
    pub regex_literals: bool,
}

impl Default for LiteralSyntax {
    fn default() -> Self {
        Self {
            backticks: true,
            triple_quotes: false,
            long_brackets: false,
            lifetimes: false,
            raw_strings: false,
            regex_literals: false,
        }
    }
}

/// Placeholder-substituted text plus the literals it stands for, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    pub text: String,
    pub literals: Vec<String>,
}

impl ProtectedText {
    pub fn restore(&self) -> String {
        restore(&self.text, &self.literals)
    }
}

pub(crate) fn placeholder(idx: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{idx}{PLACEHOLDER_SUFFIX}")
}

/// Protect quotes and backtick templates.
pub fn protect(text: &str) -> ProtectedText {
    protect_with(text, LiteralSyntax::default())
}

pub fn protect_with(text: &str, syntax: LiteralSyntax) -> ProtectedText {
    let b = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut literals = Vec::new();
    let mut copied = 0;
    let mut i = 0;

    while i < b.len() {
        let end = match b[i] {
            b'\'' if syntax.lifetimes && lexer::is_lifetime(b, i) => {
                i += 1;
                continue;
            }
            b'\'' | b'"' if syntax.triple_quotes && lexer::is_triple(b, i) => lexer::skip_triple(b, i),
            b'\'' | b'"' => lexer::skip_quoted(b, i, true),
            b'`' if syntax.backticks => lexer::skip_template(b, i),
            b'r' if syntax.raw_strings => match lexer::raw_string_end(b, i) {
                Some(end) => end,
                None => {
                    i += 1;
                    continue;
                }
            },
            b'/' if syntax.regex_literals && lexer::regex_allowed(&b[..i]) => match lexer::regex_end(b, i) {
                Some(end) => end,
                None => {
                    i += 1;
                    continue;
                }
            },
            b'[' if syntax.long_brackets => match lexer::long_bracket_level(b, i) {
                Some(level) => lexer::skip_long_bracket(b, i, level),
                None => {
                    i += 1;
                    continue;
                }
            },
            _ => {
                i += 1;
                continue;
            }
        };
        out.push_str(&text[copied..i]);
        out.push_str(&placeholder(literals.len()));
        literals.push(text[i..end].to_string());
        copied = end;
        i = end;
    }
    out.push_str(&text[copied..]);

    ProtectedText { text: out, literals }
}

/// Put literals back in place of their placeholders. Single pass: restored
/// text is never rescanned.
pub fn restore(text: &str, literals: &[String]) -> String {
    if literals.is_empty() {
        return text.to_string();
    }
    RE_PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| literals.get(idx))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
