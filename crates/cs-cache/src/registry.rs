use crate::collection::CollectionCache;
use crate::fingerprint::{FileStamp, Fingerprint};
use cs_core::{CacheConfig, OutputFormat, TransformMode, TransformResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// All collection caches of a process, keyed by collection id. Safe to share
/// across threads.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    config: CacheConfig,
    collections: Mutex<HashMap<String, CollectionCache>>,
}

impl CacheRegistry {
    pub fn new(config: CacheConfig) -> Self {
        Self { config, collections: Mutex::new(HashMap::new()) }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CollectionCache>> {
        self.collections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_cached_result(
        &self,
        collection_id: &str,
        files: &[FileStamp],
        format: OutputFormat,
        mode: TransformMode,
    ) -> Option<TransformResult> {
        let fingerprint = Fingerprint::of(files);
        let mut collections = self.lock();
        let hit = collections.get_mut(collection_id)?.get(format, mode, fingerprint);
        debug!(collection_id, %format, %mode, hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn set_cached_result(
        &self,
        collection_id: &str,
        files: &[FileStamp],
        format: OutputFormat,
        mode: TransformMode,
        result: TransformResult,
    ) {
        let fingerprint = Fingerprint::of(files);
        self.lock()
            .entry(collection_id.to_string())
            .or_insert_with(|| CollectionCache::new(&self.config))
            .set(format, mode, fingerprint, result);
    }

    /// Discard everything cached for a collection, e.g. when it is closed.
    pub fn clear_collection_cache(&self, collection_id: &str) {
        if self.lock().remove(collection_id).is_some() {
            debug!(collection_id, "cleared collection cache");
        }
    }

    pub fn collection_count(&self) -> usize {
        self.lock().len()
    }
}
