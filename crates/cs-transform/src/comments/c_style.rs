//! C-style scanner: `//`, `/* */`, quotes, templates, regex literals.
//!
//! States are Code, LineComment, BlockComment and MarkupComment. String,
//! template and regex literals are consumed whole from Code by the span
//! scanners in `lexer`, which is equivalent to walking their states but
//! keeps the nesting of template interpolations in one place.

use super::{starts_with_at, Emitter};
use crate::language::LanguageProfile;
use crate::lexer;
use crate::protect::ProtectedText;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    MarkupComment,
}

pub(super) fn strip(src: &str, profile: &LanguageProfile) -> Result<ProtectedText> {
    let b = src.as_bytes();
    let mut em = Emitter::new(b);
    let mut state = State::Code;
    let mut i = 0;

    while i < b.len() {
        match state {
            State::Code => {
                let next = b.get(i + 1).copied();
                match b[i] {
                    b'/' if profile.line_comments && next == Some(b'/') => {
                        state = State::LineComment;
                        i += 2;
                    }
                    b'/' if profile.block_comments && next == Some(b'*') => {
                        state = State::BlockComment;
                        i += 2;
                    }
                    // PHP 8 attributes start with `#[`.
                    b'#' if profile.hash_comments && next != Some(b'[') => {
                        state = State::LineComment;
                        i += 1;
                    }
                    b'<' if profile.markup_comments && starts_with_at(b, i, b"<!--") => {
                        state = State::MarkupComment;
                        i += 4;
                    }
                    b'"' => i = em.literal(i, lexer::skip_quoted(b, i, true)),
                    b'\'' if profile.lifetimes && lexer::is_lifetime(b, i) => {
                        em.push(b'\'');
                        i += 1;
                    }
                    b'\'' => i = em.literal(i, lexer::skip_quoted(b, i, true)),
                    b'`' => i = em.literal(i, lexer::skip_template(b, i)),
                    b'r' if profile.raw_strings => match lexer::raw_string_end(b, i) {
                        Some(end) => i = em.literal(i, end),
                        None => {
                            em.push(b'r');
                            i += 1;
                        }
                    },
                    b'/' if profile.regex_literals && em.regex_allowed() => match lexer::regex_end(b, i) {
                        Some(end) => i = em.literal(i, end),
                        None => {
                            em.push(b'/');
                            i += 1;
                        }
                    },
                    c => {
                        em.push(c);
                        i += 1;
                    }
                }
            }
            State::LineComment => {
                // The newline itself stays in the output.
                i = lexer::line_end(b, i);
                state = State::Code;
            }
            State::BlockComment => {
                i = lexer::skip_past(b, i, b"*/");
                em.push(b' ');
                state = State::Code;
            }
            State::MarkupComment => {
                i = lexer::skip_past(b, i, b"-->");
                em.push(b' ');
                state = State::Code;
            }
        }
    }

    em.finish()
}
