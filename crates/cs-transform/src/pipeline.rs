//! Transform pipeline: classify, then strip or minify one file.

use crate::comments::remove_comments_with;
use crate::language::{self, LanguageProfile};
use crate::minify::minify_with;
use cs_core::{LanguageFamily, PipelineConfig, SourceFile, TransformMode};
use tracing::debug;

/// Outcome for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutput {
    pub content: String,
    pub family: LanguageFamily,
    pub original_len: usize,
    pub processed_len: usize,
}

impl FileOutput {
    pub fn savings_percent(&self) -> u32 {
        cs_core::types::savings_percent(self.original_len, self.processed_len)
    }
}

/// Runs one mode over one file at a time. Cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    pub limits: PipelineConfig,
}

impl TransformPipeline {
    pub fn new(limits: PipelineConfig) -> Self {
        Self { limits }
    }

    /// Transform `content` as if it lived in a file called `filename`.
    pub fn transform(&self, filename: &str, content: &str, mode: TransformMode) -> String {
        let profile = language::profile(filename);
        self.transform_profiled(&profile, content, mode)
    }

    pub fn transform_profiled(&self, profile: &LanguageProfile, content: &str, mode: TransformMode) -> String {
        match mode {
            TransformMode::Raw => content.to_string(),
            TransformMode::RemoveComments => remove_comments_with(content, profile, &self.limits),
            TransformMode::Minify => minify_with(content, profile, &self.limits),
        }
    }

    pub fn transform_file(&self, file: &SourceFile, mode: TransformMode) -> FileOutput {
        let profile = language::profile(&file.name);
        let content = self.transform_profiled(&profile, &file.content, mode);
        debug!(
            file = %file.label(),
            family = %profile.family,
            %mode,
            before = file.content.len(),
            after = content.len(),
            "transformed file"
        );
        FileOutput {
            family: profile.family,
            original_len: file.content.len(),
            processed_len: content.len(),
            content,
        }
    }
}
