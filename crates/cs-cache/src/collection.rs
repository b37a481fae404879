use crate::fingerprint::Fingerprint;
use chrono::{DateTime, Utc};
use cs_core::{CacheConfig, OutputFormat, TransformMode, TransformResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// An output format and a mode. One collection holds at most one entry per key.
pub type CacheKey = (OutputFormat, TransformMode);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub result: TransformResult,
    pub inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.inserted_at >= ttl
    }
}

/// Cache for a single collection. Not synchronised; see `CacheRegistry` for
/// shared use.
#[derive(Debug, Clone)]
pub struct CollectionCache {
    fingerprint: Option<Fingerprint>,
    entries: HashMap<CacheKey, CacheEntry>,
    /// Insertion order, oldest first.
    order: VecDeque<CacheKey>,
    ttl: chrono::Duration,
    capacity: usize,
}

impl CollectionCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            fingerprint: None,
            entries: HashMap::new(),
            order: VecDeque::new(),
            ttl: chrono::Duration::from_std(config.ttl()).unwrap_or(chrono::Duration::MAX),
            capacity: config.capacity.max(1),
        }
    }

    pub fn get(&mut self, format: OutputFormat, mode: TransformMode, fingerprint: Fingerprint) -> Option<TransformResult> {
        self.get_at(format, mode, fingerprint, Utc::now())
    }

    pub fn set(&mut self, format: OutputFormat, mode: TransformMode, fingerprint: Fingerprint, result: TransformResult) {
        self.set_at(format, mode, fingerprint, result, Utc::now());
    }

    pub(crate) fn get_at(
        &mut self,
        format: OutputFormat,
        mode: TransformMode,
        fingerprint: Fingerprint,
        now: DateTime<Utc>,
    ) -> Option<TransformResult> {
        if self.fingerprint != Some(fingerprint) {
            self.invalidate(fingerprint);
            return None;
        }
        let key = (format, mode);
        let entry = self.entries.get(&key)?;
        if entry.is_expired(now, self.ttl) {
            debug!(%format, %mode, "cache entry expired");
            self.remove(&key);
            return None;
        }
        Some(entry.result.clone())
    }

    pub(crate) fn set_at(
        &mut self,
        format: OutputFormat,
        mode: TransformMode,
        fingerprint: Fingerprint,
        result: TransformResult,
        now: DateTime<Utc>,
    ) {
        if self.fingerprint != Some(fingerprint) {
            self.invalidate(fingerprint);
        }
        let key = (format, mode);
        self.order.retain(|k| *k != key);
        self.order.push_back(key);
        self.entries.insert(key, CacheEntry { result, inserted_at: now });

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else { break };
            self.entries.remove(&oldest);
            debug!(format = %oldest.0, mode = %oldest.1, "evicted oldest cache entry");
        }
    }

    /// Drop every entry and forget the fingerprint.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.fingerprint = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }

    fn invalidate(&mut self, fingerprint: Fingerprint) {
        if !self.entries.is_empty() {
            debug!(old = ?self.fingerprint, new = %fingerprint, dropped = self.entries.len(), "collection changed, dropping cache");
        }
        self.entries.clear();
        self.order.clear();
        self.fingerprint = Some(fingerprint);
    }

    fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

impl Default for CollectionCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
