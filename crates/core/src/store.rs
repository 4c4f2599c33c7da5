//! Durable key-value storage
//!
//! The storefront persists a handful of small string values (the last
//! resolved delivery location, display preferences). Anything that can
//! `get`/`set` strings by key satisfies [`KeyValueStore`]:
//!
//! - [`FileStore`]: one file per key, integrity-checked, optional memory layer
//! - [`MemoryStore`]: process-local map
//!
//! # Example
//!
//! ```rust,no_run
//! use bitzy_core::store::{FileStore, KeyValueStore};
//!
//! let store = FileStore::open("/tmp/bitzy-store")?;
//! store.set("bitzy:prefs", r#"{"vegOnly":true}"#)?;
//! assert!(store.get("bitzy:prefs")?.is_some());
//! # Ok::<(), bitzy_core::Error>(())
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// String key-value storage
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`, returning whether one existed
    fn remove(&self, key: &str) -> Result<bool>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

/// On-disk envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    /// Unhashed key, kept for debugging
    key: String,
    value: String,
    /// SHA-256 of `value`
    hash: String,
}

/// File-based store with optional in-memory layer
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    memory: Option<RwLock<HashMap<String, String>>>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir` with a memory layer
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(dir, true)
    }

    /// Open a store, choosing whether reads are cached in memory
    pub fn with_options(dir: impl AsRef<Path>, memory_layer: bool) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            Error::from(e).with_context(format!("Creating store directory {}", dir.display()))
        })?;

        let memory = memory_layer.then(|| RwLock::new(HashMap::new()));

        Ok(Self { dir, memory })
    }

    /// Directory holding the stored files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hash_hex(key.as_bytes())))
    }

    fn remember(&self, key: &str, value: &str) {
        if let Some(ref memory) = self.memory {
            if let Ok(mut guard) = memory.write() {
                guard.insert(key.to_string(), value.to_string());
            }
        }
    }

    fn forget(&self, key: &str) {
        if let Some(ref memory) = self.memory {
            if let Ok(mut guard) = memory.write() {
                guard.remove(key);
            }
        }
    }

    fn discard_corrupt(&self, key: &str, path: &Path, reason: &str) {
        tracing::warn!(key, path = %path.display(), reason, "Discarding corrupt store entry");
        if let Err(e) = fs::remove_file(path) {
            tracing::debug!(key, path = %path.display(), error = %e, "Failed to remove corrupt store entry");
        }
        self.forget(key);
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        // Try memory first
        if let Some(ref memory) = self.memory {
            let guard = memory
                .read()
                .map_err(|_| Error::new(ErrorCode::Internal, "Store memory layer poisoned"))?;
            if let Some(value) = guard.get(key) {
                return Ok(Some(value.clone()));
            }
        }

        let path = self.entry_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::from(e).with_context(format!("Reading {key}"))),
        };

        let Ok(entry) = serde_json::from_str::<StoredEntry>(&raw) else {
            self.discard_corrupt(key, &path, "unparseable envelope");
            return Ok(None);
        };

        if entry.key != key || entry.hash != hash_hex(entry.value.as_bytes()) {
            self.discard_corrupt(key, &path, "integrity check failed");
            return Ok(None);
        }

        self.remember(key, &entry.value);
        Ok(Some(entry.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = StoredEntry {
            key: key.to_string(),
            value: value.to_string(),
            hash: hash_hex(value.as_bytes()),
        };

        let path = self.entry_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(&entry)?)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|e| {
                Error::new(ErrorCode::StorageError, format!("Failed to write {key}"))
                    .with_source(e)
            })?;

        self.remember(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.forget(key);

        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::from(e).with_context(format!("Removing {key}"))),
        }
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .values
            .read()
            .map_err(|_| Error::new(ErrorCode::Internal, "Memory store poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .values
            .write()
            .map_err(|_| Error::new(ErrorCode::Internal, "Memory store poisoned"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut guard = self
            .values
            .write()
            .map_err(|_| Error::new(ErrorCode::Internal, "Memory store poisoned"))?;
        Ok(guard.remove(key).is_some())
    }
}

fn hash_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
