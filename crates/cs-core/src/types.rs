use crate::error::StripError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Comment-syntax family a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageFamily {
    /// `//` and `/* */`.
    CStyle,
    /// `#` line comments, triple-quoted strings.
    PythonStyle,
    /// `<!-- -->` only.
    HtmlStyle,
    /// `--` and `/* */`, quotes escaped by doubling.
    SqlStyle,
    /// `--` and `--[==[ ]==]` long brackets.
    LuaStyle,
    /// Unrecognised extension. Scanned as C-style on a best-effort basis.
    Unknown,
}

impl fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LanguageFamily::CStyle => "c-style",
            LanguageFamily::PythonStyle => "python-style",
            LanguageFamily::HtmlStyle => "html-style",
            LanguageFamily::SqlStyle => "sql-style",
            LanguageFamily::LuaStyle => "lua-style",
            LanguageFamily::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// What to do with each file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformMode {
    Raw,
    RemoveComments,
    Minify,
}

impl TransformMode {
    pub const ALL: [TransformMode; 3] = [
        TransformMode::Raw,
        TransformMode::RemoveComments,
        TransformMode::Minify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformMode::Raw => "raw",
            TransformMode::RemoveComments => "remove-comments",
            TransformMode::Minify => "minify",
        }
    }

    /// Unknown strings fall back to `Raw`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(TransformMode::Raw)
    }
}

impl FromStr for TransformMode {
    type Err = StripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(TransformMode::Raw),
            "remove-comments" => Ok(TransformMode::RemoveComments),
            "minify" => Ok(TransformMode::Minify),
            other => Err(StripError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the caller labels each file in the assembled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Markdown,
    Xml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Plain, OutputFormat::Markdown, OutputFormat::Xml];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Xml => "xml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = StripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "xml" => Ok(OutputFormat::Xml),
            other => Err(StripError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded file handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    pub content: String,
    pub is_text: bool,
}

impl SourceFile {
    pub fn text(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            path: name.clone(),
            name,
            content: content.into(),
            is_text: true,
        }
    }

    pub fn binary(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            path: name.clone(),
            name,
            content: String::new(),
            is_text: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Label used in file headers: the path when known, else the name.
    pub fn label(&self) -> &str {
        if self.path.is_empty() { &self.name } else { &self.path }
    }

    /// Lowercased extension without the dot, or "" when there is none.
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Output of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub lines: Vec<String>,
    pub size_savings_percent: u32,
    #[serde(default)]
    pub original_bytes: usize,
    #[serde(default)]
    pub processed_bytes: usize,
}

impl TransformResult {
    pub fn new(lines: Vec<String>, original_bytes: usize, processed_bytes: usize) -> Self {
        Self {
            lines,
            size_savings_percent: savings_percent(original_bytes, processed_bytes),
            original_bytes,
            processed_bytes,
        }
    }

    /// Join the lines back into one buffer.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// `round((original - processed) / original * 100)`, floored at 0.
pub fn savings_percent(original: usize, processed: usize) -> u32 {
    if original == 0 || processed >= original {
        return 0;
    }
    (((original - processed) as f64 / original as f64) * 100.0).round() as u32
}

/// Identifies one request to an execution host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req_{}", self.0.simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("remove-comments".parse::<TransformMode>().unwrap(), TransformMode::RemoveComments);
        assert_eq!(" Minify ".parse::<TransformMode>().unwrap(), TransformMode::Minify);
        assert!("strip".parse::<TransformMode>().is_err());
        assert_eq!(TransformMode::parse_lenient("strip"), TransformMode::Raw);
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&TransformMode::RemoveComments).unwrap();
        assert_eq!(json, "\"remove-comments\"");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!(matches!("yaml".parse::<OutputFormat>(), Err(StripError::InvalidFormat(_))));
    }

    #[test]
    fn test_savings() {
        assert_eq!(savings_percent(100, 75), 25);
        assert_eq!(savings_percent(3, 2), 33);
        assert_eq!(savings_percent(100, 100), 0);
        assert_eq!(savings_percent(100, 120), 0);
        assert_eq!(savings_percent(0, 0), 0);
    }

    #[test]
    fn test_source_file_wire_shape() {
        let f: SourceFile = serde_json::from_str(
            r#"{"id":"1","name":"a.JS","path":"src/a.JS","content":"x","isText":true}"#,
        )
        .unwrap();
        assert!(f.is_text);
        assert_eq!(f.extension(), "js");
        assert_eq!(f.label(), "src/a.JS");
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert!(id.to_string().starts_with("req_"));
        assert_ne!(id, RequestId::new());
    }
}
