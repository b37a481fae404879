//! Markup scanner. `<!-- -->` is the only comment form; quotes only
//! delimit strings inside a tag, and `<script>`/`<style>` bodies and CDATA
//! sections are copied verbatim.

use super::{starts_with_at, Emitter};
use crate::lexer;
use crate::protect::ProtectedText;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Tag,
    Comment,
}

const RAW_TEXT_ELEMENTS: &[&[u8]] = &[b"script", b"style"];

pub(super) fn strip(src: &str) -> Result<ProtectedText> {
    let b = src.as_bytes();
    let mut em = Emitter::new(b);
    let mut state = State::Text;
    let mut tag_name: Vec<u8> = Vec::new();
    let mut closing = false;
    let mut i = 0;

    while i < b.len() {
        match state {
            State::Text => {
                if starts_with_at(b, i, b"<!--") {
                    state = State::Comment;
                    i += 4;
                } else if starts_with_at(b, i, b"<![CDATA[") {
                    i = em.literal(i, lexer::skip_past(b, i, b"]]>"));
                } else if b[i] == b'<' && opens_tag(b.get(i + 1).copied()) {
                    closing = b.get(i + 1) == Some(&b'/');
                    let name_start = if closing { i + 2 } else { i + 1 };
                    let name_end = name_start
                        + b[name_start..]
                            .iter()
                            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, b'-' | b':'))
                            .count();
                    tag_name = b[name_start..name_end].to_ascii_lowercase();
                    em.copy(i, name_end);
                    i = name_end;
                    state = State::Tag;
                } else {
                    em.push(b[i]);
                    i += 1;
                }
            }
            State::Tag => match b[i] {
                q @ (b'"' | b'\'') => {
                    let end = b[i + 1..]
                        .iter()
                        .position(|&c| c == q)
                        .map_or(b.len(), |p| i + 1 + p + 1);
                    i = em.literal(i, end);
                }
                b'>' => {
                    em.push(b'>');
                    i += 1;
                    state = State::Text;
                    if !closing && RAW_TEXT_ELEMENTS.contains(&tag_name.as_slice()) {
                        let end = raw_text_end(b, i, &tag_name);
                        if end > i {
                            i = em.literal(i, end);
                        }
                    }
                }
                c => {
                    em.push(c);
                    i += 1;
                }
            },
            State::Comment => {
                i = lexer::skip_past(b, i, b"-->");
                em.push(b' ');
                state = State::Text;
            }
        }
    }

    em.finish()
}

fn opens_tag(next: Option<u8>) -> bool {
    matches!(next, Some(c) if c.is_ascii_alphabetic() || c == b'/' || c == b'!' || c == b'?')
}

/// Start of the closing `</name` for a raw-text element, searched
/// case-insensitively.
fn raw_text_end(b: &[u8], from: usize, name: &[u8]) -> usize {
    let mut i = from;
    while i < b.len() {
        if b[i] == b'<'
            && b.get(i + 1) == Some(&b'/')
            && b.get(i + 2..i + 2 + name.len()).is_some_and(|n| n.eq_ignore_ascii_case(name))
        {
            return i;
        }
        i += 1;
    }
    b.len()
}
