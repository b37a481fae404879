//! Collection fingerprint over ordered (file id, content length) pairs.
//! Not cryptographic: it only has to notice that the file set changed.

use cs_core::SourceFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One file's contribution to a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStamp {
    pub id: String,
    pub content_length: usize,
}

impl FileStamp {
    pub fn new(id: impl Into<String>, content_length: usize) -> Self {
        Self { id: id.into(), content_length }
    }
}

impl From<&SourceFile> for FileStamp {
    fn from(file: &SourceFile) -> Self {
        Self::new(file.id.clone(), file.content.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub fn of(stamps: &[FileStamp]) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        stamps.len().hash(&mut hasher);
        for stamp in stamps {
            stamp.id.hash(&mut hasher);
            stamp.content_length.hash(&mut hasher);
        }
        Self(hasher.finish())
    }

    pub fn of_files(files: &[SourceFile]) -> Self {
        let stamps: Vec<FileStamp> = files.iter().map(FileStamp::from).collect();
        Self::of(&stamps)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
