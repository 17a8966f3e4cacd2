use std::path::Path;

use crate::backend::{ArchiveReader, RarReader, SevenZReader, ZipReader};
use crate::error::{ArchiveError, Result};

/// Famille de format d'une archive, déduite de son extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Zip,
    Rar,
    SevenZ,
}

impl ArchiveFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "zip" | "cbz" | "epub" => Some(Self::Zip),
            "rar" | "cbr" => Some(Self::Rar),
            "7z" | "cb7" => Some(Self::SevenZ),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or_else(|| {
            let shown = if ext.is_empty() {
                path.display().to_string()
            } else {
                format!(".{}", ext)
            };
            ArchiveError::UnsupportedFormat(shown)
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::SevenZ => "7z",
        }
    }

    pub fn reader(&self) -> &'static dyn ArchiveReader {
        match self {
            Self::Zip => &ZipReader,
            Self::Rar => &RarReader,
            Self::SevenZ => &SevenZReader,
        }
    }
}
