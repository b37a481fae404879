//! Typed messages between the host and its worker thread. The serde shape
//! matches the JSON wire form so a batch can be logged or replayed as-is.

use cs_core::{OutputFormat, RequestId, SourceFile, TransformMode, TransformResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    pub id: RequestId,
    pub files: Vec<SourceFile>,
    #[serde(rename = "outputFormatChoice")]
    pub format: OutputFormat,
    pub mode: TransformMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub id: RequestId,
    /// 0..=100
    pub percent: u32,
    pub processed_files: usize,
    pub total_files: usize,
    /// Label of the last file finished.
    pub current_file: String,
}

impl ProgressUpdate {
    pub fn new(id: RequestId, processed_files: usize, total_files: usize, current_file: impl Into<String>) -> Self {
        let percent = if total_files == 0 { 100 } else { (processed_files * 100 / total_files) as u32 };
        Self {
            id,
            percent,
            processed_files,
            total_files,
            current_file: current_file.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub id: RequestId,
    #[serde(flatten)]
    pub result: TransformResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerResponse {
    Progress(ProgressUpdate),
    Result(BatchResult),
}

impl WorkerResponse {
    pub fn id(&self) -> RequestId {
        match self {
            WorkerResponse::Progress(p) => p.id,
            WorkerResponse::Result(r) => r.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        let id = RequestId::new();
        assert_eq!(ProgressUpdate::new(id, 10, 25, "a.js").percent, 40);
        assert_eq!(ProgressUpdate::new(id, 25, 25, "a.js").percent, 100);
        assert_eq!(ProgressUpdate::new(id, 0, 0, "").percent, 100);
    }

    #[test]
    fn test_response_wire_shape() {
        let id = RequestId::new();
        let msg = WorkerResponse::Result(BatchResult {
            id,
            result: TransformResult::new(vec!["x = 1".into()], 10, 5),
        });
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "result");
        assert_eq!(v["id"], id.0.to_string());
        assert_eq!(v["lines"][0], "x = 1");
        assert!(v.get("sizeSavingsPercent").is_some());

        let progress = serde_json::to_value(WorkerResponse::Progress(ProgressUpdate::new(id, 1, 2, "a.js"))).unwrap();
        assert_eq!(progress["type"], "progress");
        assert_eq!(progress["currentFile"], "a.js");
        assert!(progress.get("percent").is_some());
    }

    #[test]
    fn test_request_wire_shape() {
        let req = WorkerRequest {
            id: RequestId::new(),
            files: vec![SourceFile::text("1", "a.js", "x")],
            format: OutputFormat::Markdown,
            mode: TransformMode::RemoveComments,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["outputFormatChoice"], "markdown");
        assert_eq!(v["mode"], "remove-comments");
        assert_eq!(v["files"][0]["isText"], true);
    }
}
