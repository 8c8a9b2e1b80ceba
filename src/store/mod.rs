//! Local persistence for small JSON documents (access history, favorites).
//!
//! Every document is read and rewritten whole. Values are wrapped in a
//! versioned envelope so that a format change is detected on load instead of
//! being misread.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{DriveError, Result};

/// Key of the persisted access history
pub const HISTORY_KEY: &str = "access-history";

/// Key of the persisted favorites set
pub const FAVORITES_KEY: &str = "favorites";

/// Schema version written by this build
pub const DOCUMENT_VERSION: u32 = 1;

/// Key-value store for whole JSON documents
pub trait DocumentStore: Send + Sync {
    /// Read the document stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    fn save(&self, key: &str, contents: &str) -> Result<()>;
}

/// Stores each document as `<dir>/<key>.json`
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DriveError::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save(&self, key: &str, contents: &str) -> Result<()> {
        let path = self.path_for(key);
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            DriveError::Persistence(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        // Write beside the target and rename so a crash never leaves half a document
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| {
            DriveError::Persistence(format!("Failed to create temp file in {}: {}", self.dir.display(), e))
        })?;
        tmp.write_all(contents.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| DriveError::Persistence(format!("Failed to write {}: {}", path.display(), e)))?;
        tmp.persist(&path)
            .map_err(|e| DriveError::Persistence(format!("Failed to replace {}: {}", path.display(), e.error)))?;

        log::debug!("Persisted {} ({} bytes)", path.display(), contents.len());
        Ok(())
    }
}

/// Session-only store kept in memory
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.docs.lock().get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> Result<()> {
        self.docs.lock().insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

#[derive(Serialize)]
struct DocumentRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct DocumentHeader {
    version: u32,
}

#[derive(Deserialize)]
struct Document<T> {
    data: T,
}

/// Load and unwrap a versioned document
pub fn load_document<T: DeserializeOwned>(store: &dyn DocumentStore, key: &str) -> Result<Option<T>> {
    let raw = match store.load(key)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let header: DocumentHeader = serde_json::from_str(&raw)
        .map_err(|e| DriveError::Serialization(format!("Document '{}' has no version tag: {}", key, e)))?;
    if header.version != DOCUMENT_VERSION {
        return Err(DriveError::UnsupportedVersion {
            key: key.to_string(),
            found: header.version,
        });
    }

    let doc: Document<T> = serde_json::from_str(&raw)
        .map_err(|e| DriveError::Serialization(format!("Document '{}' is malformed: {}", key, e)))?;
    Ok(Some(doc.data))
}

/// Wrap a value in the versioned envelope and persist it
pub fn save_document<T: Serialize>(store: &dyn DocumentStore, key: &str, value: &T) -> Result<()> {
    let doc = DocumentRef {
        version: DOCUMENT_VERSION,
        data: value,
    };
    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| DriveError::Serialization(format!("Failed to encode '{}': {}", key, e)))?;
    store.save(key, &json)
}
