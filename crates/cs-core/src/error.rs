use crate::types::RequestId;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StripError {
    /// A newer request superseded this one. Callers should ignore it quietly.
    #[error("Request {request_id} was cancelled by a newer request")]
    Cancelled { request_id: RequestId },
    #[error("Request {request_id} timed out after {after:?}")]
    Timeout { request_id: RequestId, after: Duration },
    #[error("Execution host has been terminated")]
    HostClosed,
    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),
    #[error("Invalid transform mode: {0}")]
    InvalidMode(String),
    #[error("Invalid output format: {0}")]
    InvalidFormat(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StripError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StripError::Cancelled { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, StripError::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, StripError>;
