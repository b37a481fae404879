//! One open collection of files: a host to run batches on and the cache in
//! front of it.

use anyhow::{Context, Result};
use cs_cache::{CacheRegistry, FileStamp};
use cs_core::{OutputFormat, SourceFile, TransformMode, TransformResult};
use cs_host::ExecutionHost;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct Workspace {
    collection_id: String,
    host: ExecutionHost,
    cache: CacheRegistry,
}

impl Workspace {
    pub fn new(collection_id: impl Into<String>, host: ExecutionHost, cache: CacheRegistry) -> Self {
        Self { collection_id: collection_id.into(), host, cache }
    }

    /// Serve from cache when the file set is unchanged, otherwise run the
    /// batch and remember the result.
    pub async fn transform(
        &self,
        files: Vec<SourceFile>,
        mode: TransformMode,
        format: OutputFormat,
    ) -> Result<TransformResult> {
        let stamps: Vec<FileStamp> = files.iter().map(FileStamp::from).collect();
        if let Some(hit) = self.cache.get_cached_result(&self.collection_id, &stamps, format, mode) {
            debug!(collection = %self.collection_id, %mode, %format, "served from cache");
            return Ok(hit);
        }

        let result = self.host.run(files, mode, format).await?;
        info!(
            collection = %self.collection_id,
            %mode,
            lines = result.lines.len(),
            savings = result.size_savings_percent,
            "transformed collection"
        );
        self.cache
            .set_cached_result(&self.collection_id, &stamps, format, mode, result.clone());
        Ok(result)
    }

    /// Drop the cache and stop the worker.
    pub fn close(mut self) {
        self.cache.clear_collection_cache(&self.collection_id);
        self.host.terminate();
    }
}

/// Read files from disk. Content that is not UTF-8 is kept as a binary entry
/// so it is skipped by the pipeline but still part of the fingerprint.
pub fn load_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .enumerate()
        .map(|(idx, path)| load_file(idx, path))
        .collect()
}

fn load_file(idx: usize, path: &Path) -> Result<SourceFile> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let label = path.display().to_string();
    let file = match String::from_utf8(bytes) {
        Ok(content) => SourceFile::text(idx.to_string(), name, content),
        Err(_) => {
            debug!(path = %label, "not UTF-8, treating as binary");
            SourceFile::binary(idx.to_string(), name)
        }
    };
    Ok(file.with_path(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::StripConfig;
    use cs_host::BareFormatter;
    use std::io::Write;

    fn workspace() -> Workspace {
        let config = StripConfig::default();
        let host = ExecutionHost::create(&config, BareFormatter).unwrap();
        Workspace::new("test", host, CacheRegistry::new(config.cache))
    }

    fn files() -> Vec<SourceFile> {
        vec![SourceFile::text("1", "a.js", "// header\nconst x = 1;")]
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let mut ws = workspace();
        let first = ws.transform(files(), TransformMode::Minify, OutputFormat::Plain).await.unwrap();
        assert_eq!(first.lines, vec!["const x = 1;"]);

        // With the worker gone, only a cache hit can succeed.
        ws.host.terminate();
        let second = ws.transform(files(), TransformMode::Minify, OutputFormat::Plain).await.unwrap();
        assert_eq!(second, first);

        let changed = vec![SourceFile::text("1", "a.js", "// header\nconst x = 12;")];
        assert!(ws.transform(changed, TransformMode::Minify, OutputFormat::Plain).await.is_err());
    }

    #[tokio::test]
    async fn test_cache_populated_then_closed() {
        let ws = workspace();
        ws.transform(files(), TransformMode::Raw, OutputFormat::Plain).await.unwrap();
        assert_eq!(ws.cache.collection_count(), 1);
        ws.close();
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("main.rs");
        std::fs::write(&text, "fn main() {} // entry").unwrap();
        let bin = dir.path().join("blob.bin");
        std::fs::File::create(&bin).unwrap().write_all(&[0xff, 0xfe, 0x00]).unwrap();

        let files = load_files(&[text.clone(), bin]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].is_text);
        assert_eq!(files[0].name, "main.rs");
        assert_eq!(files[0].path, text.display().to_string());
        assert!(!files[1].is_text);
        assert_eq!(files[1].id, "1");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_files(&[PathBuf::from("/no/such/file.js")]).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
