//! Backends de lecture, un par famille de format.

mod rar_reader;
mod sevenz_reader;
mod zip_reader;

use std::io::Read;
use std::path::Path;

use crate::{ArchiveError, RawEntry, Result};

pub(crate) use rar_reader::RarReader;
pub(crate) use sevenz_reader::SevenZReader;
pub(crate) use zip_reader::ZipReader;

/// Capacités communes à tous les formats d'archive
pub trait ArchiveReader: Send + Sync {
    /// Énumère toutes les entrées, répertoires compris, dans l'ordre de stockage
    fn list_entries(&self, archive_path: &Path) -> Result<Vec<RawEntry>>;

    /// Décompresse l'entrée dont le nom brut vaut exactement `raw_name`
    fn extract(&self, archive_path: &Path, raw_name: &[u8]) -> Result<Vec<u8>>;
}

/// Taille maximale d'une entrée décompressée en mémoire
pub const MAX_ENTRY_BYTES: u64 = 512 * 1024 * 1024;

/// Réservation initiale ; au-delà, le tampon grandit au fil de la lecture
const PREALLOC_BYTES: u64 = 8 * 1024 * 1024;

pub(crate) fn check_declared_size(archive_path: &Path, declared: u64) -> Result<()> {
    if declared > MAX_ENTRY_BYTES {
        return Err(ArchiveError::read(
            archive_path,
            format!("entry declares {} bytes, limit is {}", declared, MAX_ENTRY_BYTES),
        ));
    }
    Ok(())
}

/// Lit une entrée sans faire confiance à la taille annoncée par l'en-tête
pub(crate) fn read_entry(archive_path: &Path, declared: u64, reader: impl Read) -> Result<Vec<u8>> {
    check_declared_size(archive_path, declared)?;

    let mut data = Vec::with_capacity(declared.min(PREALLOC_BYTES) as usize);
    reader
        .take(MAX_ENTRY_BYTES + 1)
        .read_to_end(&mut data)
        .map_err(|e| ArchiveError::read(archive_path, e))?;

    if data.len() as u64 > MAX_ENTRY_BYTES {
        return Err(ArchiveError::read(
            archive_path,
            format!("entry exceeds {} bytes", MAX_ENTRY_BYTES),
        ));
    }
    Ok(data)
}
