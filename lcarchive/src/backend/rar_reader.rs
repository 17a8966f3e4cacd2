use std::path::Path;

use unrar::Archive;

use super::{ArchiveReader, check_declared_size};
use crate::{ArchiveError, RawEntry, Result};

/// RAR et CBR, via la bibliothèque unrar
pub(crate) struct RarReader;

/// unrar décode lui-même les noms ; on garde leur forme OS comme clé brute.
fn raw_name_of(header: &unrar::FileHeader) -> &[u8] {
    header.filename.as_os_str().as_encoded_bytes()
}

impl ArchiveReader for RarReader {
    fn list_entries(&self, archive_path: &Path) -> Result<Vec<RawEntry>> {
        let archive = Archive::new(archive_path)
            .open_for_listing()
            .map_err(|e| ArchiveError::open(archive_path, e))?;

        let mut entries = Vec::new();
        for header in archive {
            let header = header.map_err(|e| ArchiveError::read(archive_path, e))?;
            entries.push(RawEntry {
                name: raw_name_of(&header).to_vec(),
                is_dir: header.is_directory(),
            });
        }
        Ok(entries)
    }

    fn extract(&self, archive_path: &Path, raw_name: &[u8]) -> Result<Vec<u8>> {
        let mut archive = Archive::new(archive_path)
            .open_for_processing()
            .map_err(|e| ArchiveError::open(archive_path, e))?;

        while let Some(header) = archive
            .read_header()
            .map_err(|e| ArchiveError::read(archive_path, e))?
        {
            let entry = header.entry();
            let matches = entry.is_file() && raw_name_of(entry) == raw_name;
            archive = if matches {
                check_declared_size(archive_path, entry.unpacked_size)?;
                let (data, _rest) = header
                    .read()
                    .map_err(|e| ArchiveError::read(archive_path, e))?;
                return Ok(data);
            } else {
                header
                    .skip()
                    .map_err(|e| ArchiveError::read(archive_path, e))?
            };
        }

        Err(ArchiveError::not_found(raw_name))
    }
}
