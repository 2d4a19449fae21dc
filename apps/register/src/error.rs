//! # Register Error Type
//!
//! Only startup can fail: configuration, catalog loading and opening the
//! snapshot store. Once a [`crate::Register`] exists its operations return
//! neutral values instead of errors.
//!
//! ```text
//! register.toml ──► toml::de::Error ──► RegisterError::ConfigParse
//! TILL_TIMEZONE ──► bad IANA name   ──► RegisterError::Config
//! catalog.json  ──► CoreError       ──► RegisterError::Catalog
//! data_dir      ──► StoreError      ──► RegisterError::Store
//! ```

use std::path::PathBuf;

use thiserror::Error;
use till_core::CoreError;
use till_store::StoreError;

#[derive(Debug, Error)]
pub enum RegisterError {
    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The config file is not valid TOML for `RegisterConfig`.
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A file could not be read or written.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegisterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegisterError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RegisterResult<T> = Result<T, RegisterError>;
