//! Per-file header/footer rendering, supplied by the caller.

use cs_core::OutputFormat;

/// Produces the lines placed before and after each file's content.
pub trait HeaderFormatter: Send + Sync {
    fn format_header(&self, path_label: &str, extension: &str, format: OutputFormat) -> (Vec<String>, Vec<String>);
}

impl<F> HeaderFormatter for F
where
    F: Fn(&str, &str, OutputFormat) -> (Vec<String>, Vec<String>) + Send + Sync,
{
    fn format_header(&self, path_label: &str, extension: &str, format: OutputFormat) -> (Vec<String>, Vec<String>) {
        self(path_label, extension, format)
    }
}

/// No headers at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareFormatter;

impl HeaderFormatter for BareFormatter {
    fn format_header(&self, _: &str, _: &str, _: OutputFormat) -> (Vec<String>, Vec<String>) {
        (Vec::new(), Vec::new())
    }
}

/// Banner for plain text, fenced block for markdown, `<file>` element for xml.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormatter;

impl HeaderFormatter for StandardFormatter {
    fn format_header(&self, path_label: &str, extension: &str, format: OutputFormat) -> (Vec<String>, Vec<String>) {
        match format {
            OutputFormat::Plain => (vec![format!("// File: {path_label}")], Vec::new()),
            OutputFormat::Markdown => (
                vec![format!("### {path_label}"), String::new(), format!("```{extension}")],
                vec!["```".to_string()],
            ),
            OutputFormat::Xml => (
                vec![format!("<file path=\"{}\">", escape_attr(path_label))],
                vec!["</file>".to_string()],
            ),
        }
    }
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
