//! # Export Sinks
//!
//! Where finished CSV exports go. The core only builds [`CsvExport`] values;
//! a sink decides how they leave the process.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use till_core::CsvExport;

use crate::error::{RegisterError, RegisterResult};

/// Receives finished exports.
pub trait ExportSink: Send + Sync {
    /// Delivers one export and returns where it ended up.
    fn deliver(&self, export: &CsvExport) -> RegisterResult<PathBuf>;
}

/// Writes each export as `<dir>/<filename>` in UTF-8.
///
/// An existing file with the same name is overwritten; two commits in the
/// same minute share a per-sale filename.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&self, export: &CsvExport) -> RegisterResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| RegisterError::io(&self.dir, e))?;

        let path = self.dir.join(&export.filename);
        fs::write(&path, export.content.as_bytes()).map_err(|e| RegisterError::io(&path, e))?;

        info!(?path, bytes = export.content.len(), "Export written");
        Ok(path)
    }
}
