//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! std::io::Error
//!      │
//!      ▼
//! StoreError (this module) ← adds the key / path
//!      │
//!      ▼
//! PersistenceError (till-core) ← what CartStore / SalesLedger log
//! ```

use std::path::PathBuf;

use thiserror::Error;
use till_core::PersistenceError;

/// File store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key cannot be used as a file name.
    ///
    /// Keys are limited to ASCII letters, digits, `-` and `_`.
    #[error("Invalid snapshot key: '{0}'")]
    InvalidKey(String),

    /// The data directory could not be created.
    #[error("Cannot create data directory {path:?}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading, writing or removing a snapshot file failed.
    #[error("I/O error on snapshot '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        StoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl From<StoreError> for PersistenceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { key, source } => PersistenceError::Io { key, source },
            other => PersistenceError::Backend(other.to_string()),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_maps_to_backend_error() {
        let err: PersistenceError = StoreError::InvalidKey("../etc".to_string()).into();
        assert!(matches!(err, PersistenceError::Backend(ref msg) if msg.contains("../etc")));
    }

    #[test]
    fn test_io_error_keeps_key() {
        let err: PersistenceError = StoreError::io(
            "salesLedger",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        )
        .into();
        assert!(matches!(err, PersistenceError::Io { ref key, .. } if key == "salesLedger"));
    }
}
