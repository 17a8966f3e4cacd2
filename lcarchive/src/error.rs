use std::path::{Path, PathBuf};
use thiserror::Error;

/// Erreurs de lecture d'archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to open archive {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Failed to read archive {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),
}

impl ArchiveError {
    pub(crate) fn open(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::OpenFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn read(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::ReadFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn not_found(raw_name: &[u8]) -> Self {
        Self::EntryNotFound(String::from_utf8_lossy(raw_name).into_owned())
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
