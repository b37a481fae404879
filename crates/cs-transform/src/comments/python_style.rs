//! Hash-comment scanner for Python and the shell/config family, also used
//! by the other line-comment dialects (Lisp `;`, batch `REM`).
//!
//! States: Code, Comment, and the four string forms. Triple quotes are
//! checked before single quotes so `'''` is never read as `''` + `'`.

use super::{at_line_start, block_comment_end, line_start, starts_with_at, Emitter};
use crate::language::{CommentPlacement, LanguageProfile};
use crate::lexer;
use crate::protect::ProtectedText;
use anyhow::Result;

pub(super) fn strip(src: &str, profile: &LanguageProfile) -> Result<ProtectedText> {
    let b = src.as_bytes();
    let mut em = Emitter::new(b);
    let mut depth = 0usize;
    let mut i = 0;

    while i < b.len() {
        if let Some(delims) = profile.block_delims {
            if let Some(end) = block_comment_end(b, i, &delims) {
                if !delims.line_start {
                    em.push(b' ');
                }
                i = end;
                continue;
            }
        }
        match b[i] {
            b'#' if profile.hash_comments && hash_starts_comment(b, i, profile) => i = lexer::line_end(b, i),
            b';' if semicolon_starts_comment(b, i, profile) => i = lexer::line_end(b, i),
            b'r' | b'R' | b':' if profile.rem_comments && rem_starts_comment(b, i) => i = lexer::line_end(b, i),
            // `\;` and `#\;` are escaped characters in Lisp.
            b'\\' if profile.semicolon_comments == Some(CommentPlacement::Anywhere) => {
                let end = (i + 2).min(b.len());
                em.copy(i, end);
                i = end;
            }
            b'\'' | b'"' if profile.triple_quotes && lexer::is_triple(b, i) => {
                let end = lexer::skip_triple(b, i);
                if depth == 0 && !em.continues_line() && is_removable_docstring(b, i, end) {
                    i = end;
                } else {
                    i = em.literal(i, end);
                }
            }
            b'"' => i = em.literal(i, lexer::skip_quoted(b, i, !profile.multiline_strings)),
            b'\'' if profile.single_quotes => i = em.literal(i, lexer::skip_quoted(b, i, true)),
            c => {
                match c {
                    b'(' | b'[' | b'{' => depth += 1,
                    b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
                em.push(c);
                i += 1;
            }
        }
    }

    em.finish()
}

fn hash_starts_comment(b: &[u8], i: usize, profile: &LanguageProfile) -> bool {
    if !profile.hash_word_boundary || i == 0 {
        return true;
    }
    matches!(b[i - 1], b' ' | b'\t' | b'\n' | b'\r' | b';')
}

fn semicolon_starts_comment(b: &[u8], i: usize, profile: &LanguageProfile) -> bool {
    match profile.semicolon_comments {
        Some(CommentPlacement::Anywhere) => true,
        Some(CommentPlacement::LineStart) => at_line_start(b, i),
        None => false,
    }
}

/// `REM` (any case) or `::` opening a batch line.
fn rem_starts_comment(b: &[u8], i: usize) -> bool {
    if !at_line_start(b, i) {
        return false;
    }
    if starts_with_at(b, i, b"::") {
        return true;
    }
    b.get(i..i + 3).is_some_and(|w| w.eq_ignore_ascii_case(b"rem"))
        && b.get(i + 3).map_or(true, |c| c.is_ascii_whitespace())
}

fn indent_of(line: &[u8]) -> usize {
    line.iter().take_while(|c| matches!(c, b' ' | b'\t')).count()
}

/// A triple-quoted string standing alone as a statement is a docstring.
/// It is kept when it is the only statement of an indented block, since
/// removing it would leave the block empty.
fn is_removable_docstring(b: &[u8], start: usize, end: usize) -> bool {
    let q = b[start];
    let terminated = end >= start + 6 && b[end - 3..end].iter().all(|&c| c == q);
    if !terminated || !at_line_start(b, start) {
        return false;
    }
    let ls = line_start(b, start);
    let rest_end = lexer::line_end(b, end);
    let rest = &b[end..rest_end];
    let rest_trimmed: Vec<u8> = rest.iter().copied().skip_while(|c| matches!(c, b' ' | b'\t' | b'\r')).collect();
    if !(rest_trimmed.is_empty() || rest_trimmed[0] == b'#') {
        return false;
    }

    let indent = start - ls;
    if indent == 0 {
        return true;
    }
    let next_indent = b
        .get(rest_end + 1..)
        .unwrap_or_default()
        .split(|&c| c == b'\n')
        .find(|line| {
            let body = &line[indent_of(line)..];
            !(body.is_empty() || body == b"\r" || body[0] == b'#')
        })
        .map(indent_of)
        .unwrap_or(0);
    next_indent >= indent
}
