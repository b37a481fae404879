//! Result cache: per-collection memo of transform output, keyed by output
//! format and mode, invalidated by fingerprint change, TTL or eviction.

pub mod collection;
pub mod fingerprint;
pub mod registry;

pub use collection::{CacheEntry, CacheKey, CollectionCache};
pub use fingerprint::{FileStamp, Fingerprint};
pub use registry::CacheRegistry;
