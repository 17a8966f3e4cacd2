use std::fs::File;
use std::path::Path;

use sevenz_rust::{Password, SevenZReader as Reader};

use super::{ArchiveReader, read_entry};
use crate::{ArchiveError, RawEntry, Result};

/// 7z et CB7
pub(crate) struct SevenZReader;

fn open(archive_path: &Path) -> Result<Reader<File>> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::open(archive_path, e))?;
    let len = file
        .metadata()
        .map_err(|e| ArchiveError::open(archive_path, e))?
        .len();
    Reader::new(file, len, Password::empty()).map_err(|e| ArchiveError::open(archive_path, e))
}

impl ArchiveReader for SevenZReader {
    fn list_entries(&self, archive_path: &Path) -> Result<Vec<RawEntry>> {
        let reader = open(archive_path)?;
        // Les en-têtes suffisent : rien n'est décompressé ici
        Ok(reader
            .archive()
            .files
            .iter()
            .map(|entry| RawEntry {
                name: entry.name().as_bytes().to_vec(),
                is_dir: entry.is_directory(),
            })
            .collect())
    }

    fn extract(&self, archive_path: &Path, raw_name: &[u8]) -> Result<Vec<u8>> {
        let mut reader = open(archive_path)?;

        // Les archives solides imposent un parcours séquentiel
        let mut found: Option<Result<Vec<u8>>> = None;
        reader
            .for_each_entries(|entry, data| {
                if entry.is_directory() || entry.name().as_bytes() != raw_name {
                    return Ok(true);
                }
                found = Some(read_entry(archive_path, entry.size(), data));
                Ok(false)
            })
            .map_err(|e| ArchiveError::read(archive_path, e))?;

        found.unwrap_or_else(|| Err(ArchiveError::not_found(raw_name)))
    }
}
