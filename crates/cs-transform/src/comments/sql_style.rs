//! SQL scanner: `--` and `/* */` comments. Quotes escape by doubling, so a
//! `''` inside a literal is looked ahead before the literal is closed.

use super::{starts_with_at, Emitter};
use crate::language::LanguageProfile;
use crate::lexer;
use crate::protect::ProtectedText;
use anyhow::Result;

pub(super) fn strip(src: &str, profile: &LanguageProfile) -> Result<ProtectedText> {
    let b = src.as_bytes();
    let mut em = Emitter::new(b);
    let mut i = 0;

    while i < b.len() {
        match b[i] {
            b'-' if b.get(i + 1) == Some(&b'-') => i = lexer::line_end(b, i),
            b'/' if profile.block_comments && b.get(i + 1) == Some(&b'*') => {
                i = lexer::skip_past(b, i + 2, b"*/");
                em.push(b' ');
            }
            b'\'' | b'"' | b'`' => {
                i = em.literal(i, lexer::skip_doubled(b, i));
            }
            b'$' => match dollar_quote_end(b, i) {
                Some(end) => i = em.literal(i, end),
                None => {
                    em.push(b'$');
                    i += 1;
                }
            },
            c => {
                em.push(c);
                i += 1;
            }
        }
    }

    em.finish()
}

/// PostgreSQL `$$ ... $$` or `$tag$ ... $tag$` starting at `i`.
fn dollar_quote_end(b: &[u8], i: usize) -> Option<usize> {
    if i > 0 && lexer::is_ident(b[i - 1]) {
        return None;
    }
    let tag_len = b[i + 1..]
        .iter()
        .take_while(|&&c| c.is_ascii_alphanumeric() || c == b'_')
        .count();
    let close = i + 1 + tag_len;
    if b.get(close) != Some(&b'$') || b.get(i + 1).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let delim = &b[i..=close];
    let body = close + 1;
    let end = (body..b.len())
        .find(|&k| starts_with_at(b, k, delim))
        .map_or(b.len(), |k| k + delim.len());
    Some(end)
}
