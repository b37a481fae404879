use crate::error::{Result, StripError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration, loadable from JSON. Missing sections fall back
/// to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StripConfig {
    pub pipeline: PipelineConfig,
    pub host: HostConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Inputs longer than this (in bytes) are passed through untouched.
    pub max_process_size: usize,
    /// Inputs shorter than this are passed through untouched.
    pub min_process_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    pub request_timeout_ms: u64,
    /// Emit a progress message at least every N files.
    pub progress_interval: usize,
    /// Capacity of the progress broadcast channel.
    pub progress_buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_process_size: 500 * 1024,
            min_process_size: 2,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            progress_interval: 10,
            progress_buffer: 64,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            capacity: 9,
        }
    }
}

impl HostConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl StripConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: StripConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StripError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            return Err(StripError::Config("cache.capacity must be at least 1".into()));
        }
        if self.host.progress_interval == 0 {
            return Err(StripError::Config("host.progress_interval must be at least 1".into()));
        }
        if self.host.progress_buffer == 0 {
            return Err(StripError::Config("host.progress_buffer must be at least 1".into()));
        }
        Ok(())
    }
}
