use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use zip::ZipArchive;

use super::{ArchiveReader, read_entry};
use crate::{ArchiveError, RawEntry, Result};

/// Zip, CBZ et EPUB
pub(crate) struct ZipReader;

fn open(archive_path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::open(archive_path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::open(archive_path, e))
}

impl ArchiveReader for ZipReader {
    fn list_entries(&self, archive_path: &Path) -> Result<Vec<RawEntry>> {
        let mut archive = open(archive_path)?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            // Le nom brut, sans le décodage CP437 appliqué par `name()`
            let entry = archive
                .by_index_raw(i)
                .map_err(|e| ArchiveError::read(archive_path, e))?;
            entries.push(RawEntry {
                name: entry.name_raw().to_vec(),
                is_dir: entry.is_dir(),
            });
        }

        Ok(entries)
    }

    fn extract(&self, archive_path: &Path, raw_name: &[u8]) -> Result<Vec<u8>> {
        let mut archive = open(archive_path)?;

        let mut found = None;
        for i in 0..archive.len() {
            let entry = archive
                .by_index_raw(i)
                .map_err(|e| ArchiveError::read(archive_path, e))?;
            if !entry.is_dir() && entry.name_raw() == raw_name {
                found = Some(i);
                break;
            }
        }
        let index = found.ok_or_else(|| ArchiveError::not_found(raw_name))?;

        let entry = archive
            .by_index(index)
            .map_err(|e| ArchiveError::read(archive_path, e))?;
        let declared = entry.size();
        read_entry(archive_path, declared, entry)
    }
}
