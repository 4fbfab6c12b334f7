//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the
//! store and its collaborators by reference. Nothing in the core reads
//! process-wide environment variables during an operation; the binary
//! resolves them up front and hands the result in.

use crate::constants::DEFAULT_DATA_DIR;
use crate::{StoreError, StoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidInput` if `data_dir` is empty.
    pub fn new(data_dir: PathBuf) -> StoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(StoreError::InvalidInput("data_dir cannot be empty".into()));
        }
        Ok(Self { data_dir })
    }

    /// Directory the storage medium keeps its key files in.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Resolve the data directory from an optional override.
///
/// The binary passes the value of its environment variable here; when no
/// override is set, the conventional `clinic_data/` directory relative to
/// the working directory is used.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    override_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
