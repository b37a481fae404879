//! Minifier: comment removal followed by family-aware whitespace collapsing.

use crate::comments::{self, guarded, within_limits, RE_TRAILING_WS};
use crate::language::LanguageProfile;
use crate::protect::{restore, ProtectedText};
use anyhow::Result;
use cs_core::{LanguageFamily, PipelineConfig};
use regex::Regex;
use std::sync::LazyLock;

static RE_MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\r?\n)(?:\r?\n)+").unwrap());
static RE_LEADING_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]+").unwrap());
static RE_ANGLE_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());

/// Minify for a bare family with default limits.
pub fn minify(text: &str, family: LanguageFamily) -> String {
    minify_with(text, &LanguageProfile::for_family(family), &PipelineConfig::default())
}

pub fn minify_with(text: &str, profile: &LanguageProfile, limits: &PipelineConfig) -> String {
    if !within_limits(text, limits) {
        return text.to_string();
    }
    guarded("minify", text, || minify_inner(text, profile))
}

fn minify_inner(text: &str, profile: &LanguageProfile) -> Result<String> {
    let stripped = comments::strip(text, profile)?;

    if profile.whitespace_sensitive {
        return Ok(trim_edges(&stripped));
    }
    if profile.json {
        if let Some(compact) = compact_json(&stripped.restore()) {
            return Ok(compact);
        }
    }

    let mut work = RE_TRAILING_WS.replace_all(&stripped.text, "$1").into_owned();
    work = RE_MULTI_NEWLINE.replace_all(&work, "$1").into_owned();
    work = RE_LEADING_WS.replace_all(&work, " ").into_owned();
    work = work.trim().to_string();
    if profile.markup {
        work = RE_ANGLE_WS.replace_all(&work, "><").into_owned();
    }
    Ok(restore(&work, &stripped.literals))
}

/// Indentation stays for whitespace-significant languages; comment removal
/// already tidied the lines, so only the edges go.
fn trim_edges(stripped: &ProtectedText) -> String {
    let edges = stripped.text.trim_start_matches(['\r', '\n']).trim_end();
    restore(edges, &stripped.literals)
}

/// Strict parse and compact re-serialisation. `None` when the input is not
/// valid JSON.
fn compact_json(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    serde_json::to_string(&value).ok()
}
