//! The key-value storage medium behind the store.
//!
//! The store persists whole collections as JSON strings under fixed keys
//! (`patients`, `incidents`, ...). This module defines the medium as a
//! trait so the store can be exercised against an in-memory map in tests
//! and against a directory of JSON files in the real runtime.
//!
//! The medium is deliberately dumb: it has no notion of records, no
//! transactions, and no cross-process coordination. Two processes pointed
//! at the same directory race last-write-wins, which matches the
//! semantics of the browser storage it stands in for.

use crate::{StoreError, StoreResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// A synchronous key-value storage medium holding JSON-encoded strings.
pub trait StorageMedium: Send + Sync {
    /// Reads the value stored under `key`, or `None` if the key is absent.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Storage medium backed by one JSON file per key inside a directory.
///
/// The layout is `<data_dir>/<key>.json`. Keys are fixed, internal
/// constants, never user input, so no path sanitisation is applied here.
#[derive(Debug)]
pub struct JsonFileStorage {
    data_dir: PathBuf,
}

impl JsonFileStorage {
    /// Opens the storage medium rooted at `data_dir`, creating the
    /// directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DataDirCreation` if the directory cannot be
    /// created.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(data_dir).map_err(StoreError::DataDirCreation)?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl StorageMedium for JsonFileStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::StorageRead(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        fs::write(self.key_path(key), value).map_err(StoreError::StorageWrite)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::StorageRemove(e)),
        }
    }
}

/// In-memory storage medium for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory medium.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock only means another test panicked mid-write;
        // the map itself is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageMedium for MemoryStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}
