//! Lua scanner: `--` line comments and `--[==[ ]==]` long comments. Long
//! brackets close only on a `]=*]` with the same number of `=` signs.
//!
//! Haskell shares the `--` line comment and adds nested `{- -}` blocks.

use super::{block_comment_end, starts_with_at, Emitter};
use crate::language::LanguageProfile;
use crate::lexer;
use crate::protect::ProtectedText;
use anyhow::Result;

pub(super) fn strip(src: &str, profile: &LanguageProfile) -> Result<ProtectedText> {
    let b = src.as_bytes();
    let mut em = Emitter::new(b);
    let mut i = 0;

    while i < b.len() {
        // `{-# ... #-}` is a pragma, not a comment.
        let pragma = starts_with_at(b, i, b"{-#");
        if let Some(end) = profile.block_delims.filter(|_| !pragma).and_then(|d| block_comment_end(b, i, &d)) {
            em.push(b' ');
            i = end;
            continue;
        }
        match b[i] {
            b'-' if b.get(i + 1) == Some(&b'-') => {
                let level = if profile.long_brackets { lexer::long_bracket_level(b, i + 2) } else { None };
                match level {
                    Some(level) => {
                        i = lexer::skip_long_bracket(b, i + 2, level);
                        em.push(b' ');
                    }
                    None => i = lexer::line_end(b, i),
                }
            }
            b'[' if profile.long_brackets => match lexer::long_bracket_level(b, i) {
                Some(level) => i = em.literal(i, lexer::skip_long_bracket(b, i, level)),
                None => {
                    em.push(b'[');
                    i += 1;
                }
            },
            b'\'' if profile.primes && i > 0 && lexer::is_ident(b[i - 1]) => {
                em.push(b'\'');
                i += 1;
            }
            b'\'' | b'"' => i = em.literal(i, lexer::skip_quoted(b, i, true)),
            c => {
                em.push(c);
                i += 1;
            }
        }
    }

    em.finish()
}
