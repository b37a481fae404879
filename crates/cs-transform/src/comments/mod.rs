//! Comment remover: one state machine per language family, plus the
//! shared blank-line and trailing-whitespace cleanup.

mod c_style;
mod html_style;
mod lua_style;
mod python_style;
mod sql_style;

use crate::language::{BlockDelims, LanguageProfile};
use crate::lexer;
use crate::protect::{placeholder, ProtectedText};
use anyhow::{Context, Result};
use cs_core::{LanguageFamily, PipelineConfig};
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;
use tracing::warn;

pub(crate) static RE_TRAILING_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)[ \t]+(\r?)$").unwrap());
static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\r?\n)\r?\n(?:\r?\n)+").unwrap());

/// Strip comments for a bare family with default limits.
pub fn remove_comments(text: &str, family: LanguageFamily) -> String {
    remove_comments_with(text, &LanguageProfile::for_family(family), &PipelineConfig::default())
}

/// Strip comments for a full profile. Inputs outside the size limits, and
/// inputs whose scan faults, come back unchanged.
pub fn remove_comments_with(text: &str, profile: &LanguageProfile, limits: &PipelineConfig) -> String {
    if !within_limits(text, limits) {
        return text.to_string();
    }
    guarded("remove_comments", text, || strip(text, profile).map(|p| p.restore()))
}

/// Run the family scanner, then tidy whitespace outside literals.
///
/// The result is still protected: every literal the scanner copied is a
/// placeholder, so later whitespace passes see exactly the literals the
/// scanner saw and never lex the text a second time.
pub(crate) fn strip(text: &str, profile: &LanguageProfile) -> Result<ProtectedText> {
    let mut scanned = match profile.family {
        LanguageFamily::CStyle | LanguageFamily::Unknown => c_style::strip(text, profile),
        LanguageFamily::PythonStyle => python_style::strip(text, profile),
        LanguageFamily::HtmlStyle => html_style::strip(text),
        LanguageFamily::SqlStyle => sql_style::strip(text, profile),
        LanguageFamily::LuaStyle => lua_style::strip(text, profile),
    }?;
    scanned.text = tidy_blank_lines(&scanned.text);
    Ok(scanned)
}

/// Trim trailing whitespace per line and collapse runs of 3+ newlines to 2.
/// Expects protected text.
fn tidy_blank_lines(protected: &str) -> String {
    let trimmed = RE_TRAILING_WS.replace_all(protected, "$1");
    RE_BLANK_RUN.replace_all(&trimmed, "$1$1").into_owned()
}

pub(crate) fn within_limits(text: &str, limits: &PipelineConfig) -> bool {
    text.len() >= limits.min_process_size && text.len() <= limits.max_process_size
}

/// Run `f`, falling back to the original text on error or panic.
pub(crate) fn guarded<F>(op: &'static str, text: &str, f: F) -> String
where
    F: FnOnce() -> Result<String>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(out)) => out,
        Ok(Err(err)) => {
            warn!(op, error = %err, "scan failed, keeping original text");
            text.to_string()
        }
        Err(_) => {
            warn!(op, "scanner panicked, keeping original text");
            text.to_string()
        }
    }
}

pub(crate) fn starts_with_at(b: &[u8], i: usize, needle: &[u8]) -> bool {
    b.get(i..i + needle.len()) == Some(needle)
}

/// End of a dialect block comment opening at `i`, if one opens there.
pub(crate) fn block_comment_end(b: &[u8], i: usize, delims: &BlockDelims) -> Option<usize> {
    let (open, close) = (delims.open.as_bytes(), delims.close.as_bytes());
    if !starts_with_at(b, i, open) || (delims.line_start && !at_line_start(b, i)) {
        return None;
    }
    let mut depth = 1usize;
    let mut j = i + open.len();
    while j < b.len() {
        if delims.nested && starts_with_at(b, j, open) {
            depth += 1;
            j += open.len();
        } else if starts_with_at(b, j, close) {
            depth -= 1;
            j += close.len();
            if depth == 0 {
                return Some(if delims.line_start { lexer::line_end(b, j) } else { j });
            }
        } else {
            j += 1;
        }
    }
    Some(b.len())
}

pub(crate) fn line_start(b: &[u8], i: usize) -> usize {
    b[..i].iter().rposition(|&c| c == b'\n').map_or(0, |p| p + 1)
}

/// Only blanks between the start of the line and `i`.
pub(crate) fn at_line_start(b: &[u8], i: usize) -> bool {
    b[line_start(b, i)..i].iter().all(|c| matches!(c, b' ' | b'\t'))
}

/// Builds the scanner's output. Code is copied through; literals become
/// placeholders and are collected in order.
pub(crate) struct Emitter<'a> {
    src: &'a [u8],
    out: Vec<u8>,
    literals: Vec<Vec<u8>>,
}

impl<'a> Emitter<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, out: Vec::with_capacity(src.len()), literals: Vec::new() }
    }

    pub fn copy(&mut self, from: usize, to: usize) {
        self.out.extend_from_slice(&self.src[from..to.min(self.src.len())]);
    }

    /// Emit `src[from..to]` as one opaque literal. Returns `to`.
    pub fn literal(&mut self, from: usize, to: usize) -> usize {
        let to = to.min(self.src.len());
        self.out.extend_from_slice(placeholder(self.literals.len()).as_bytes());
        self.literals.push(self.src[from..to].to_vec());
        to
    }

    pub fn push(&mut self, c: u8) {
        self.out.push(c);
    }

    /// Whether a `/` written next would start a regex literal.
    pub fn regex_allowed(&self) -> bool {
        lexer::regex_allowed(&self.out)
    }

    /// The current output line is a continuation of the previous one: the
    /// code before its line break ends in a backslash. Comments are already
    /// gone from the output, so a backslash inside one never counts.
    pub fn continues_line(&self) -> bool {
        let mut rest = self.out.as_slice();
        while let [head @ .., b' ' | b'\t'] = rest {
            rest = head;
        }
        matches!(rest, [.., b'\\', b'\r', b'\n'] | [.., b'\\', b'\n'])
    }

    pub fn finish(self) -> Result<ProtectedText> {
        let text = String::from_utf8(self.out).context("scanner cut through a UTF-8 sequence")?;
        let literals = self
            .literals
            .into_iter()
            .map(|l| String::from_utf8(l).context("literal cut through a UTF-8 sequence"))
            .collect::<Result<Vec<_>>>()?;
        Ok(ProtectedText { text, literals })
    }
}
