//! # File Store
//!
//! One JSON file per snapshot key under a data directory.
//!
//! ## Layout
//! ```text
//! <data_dir>/
//! ├── cartLines.json      ← CartStore snapshot
//! ├── salesLedger.json    ← SalesLedger snapshot
//! └── *.tmp               ← in-flight writes, renamed over the target
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use till_store::{FileStore, StoreConfig};
//!
//! let store = FileStore::open(StoreConfig::new("./data"))?;
//! # Ok::<(), till_store::StoreError>(())
//! ```

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use till_core::{PersistenceAdapter, PersistenceResult};

use crate::error::{StoreError, StoreResult};

const SNAPSHOT_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

// =============================================================================
// Configuration
// =============================================================================

/// File store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the snapshot files.
    pub data_dir: PathBuf,

    /// Create `data_dir` when it is missing.
    pub create_if_missing: bool,

    /// Flush file contents to disk before replacing a snapshot.
    pub sync_writes: bool,
}

impl StoreConfig {
    /// Creates a new config for the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            create_if_missing: true,
            sync_writes: true,
        }
    }

    /// Sets whether the data directory is created on open.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets whether writes are flushed with `sync_all`.
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// [`PersistenceAdapter`] backed by the filesystem.
///
/// Saves write the full snapshot to a temp file in the same directory and
/// rename it over the previous one, so a reader sees either the old or the
/// new snapshot.
#[derive(Debug, Clone)]
pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    /// Opens the store, creating the data directory if configured to.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        if config.create_if_missing {
            fs::create_dir_all(&config.data_dir).map_err(|source| StoreError::DataDir {
                path: config.data_dir.clone(),
                source,
            })?;
        }

        info!(data_dir = ?config.data_dir, "Opened snapshot store");
        Ok(FileStore { config })
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Path of the snapshot file for `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self
            .config
            .data_dir
            .join(format!("{key}.{SNAPSHOT_EXTENSION}")))
    }

    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(key, bytes = bytes.len(), "Read snapshot");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let temp = path.with_extension(format!("{SNAPSHOT_EXTENSION}.{TEMP_EXTENSION}"));

        let mut file = fs::File::create(&temp).map_err(|e| StoreError::io(key, e))?;
        file.write_all(bytes).map_err(|e| StoreError::io(key, e))?;
        if self.config.sync_writes {
            file.sync_all().map_err(|e| StoreError::io(key, e))?;
        }
        drop(file);

        fs::rename(&temp, &path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            StoreError::io(key, e)
        })?;

        debug!(key, bytes = bytes.len(), "Wrote snapshot");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "Removed snapshot");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }
}

impl PersistenceAdapter for FileStore {
    fn load(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>> {
        Ok(self.read(key)?)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> PersistenceResult<()> {
        Ok(self.write(key, bytes)?)
    }

    fn clear(&self, key: &str) -> PersistenceResult<()> {
        Ok(self.remove(key)?)
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
