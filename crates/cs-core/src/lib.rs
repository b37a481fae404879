//! Shared types, errors and configuration for the codestrip pipeline.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CacheConfig, HostConfig, PipelineConfig, StripConfig};
pub use error::{Result, StripError};
pub use types::{
    LanguageFamily, OutputFormat, RequestId, SourceFile, TransformMode, TransformResult,
};
