#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use sevenz_rust::{SevenZArchiveEntry, SevenZWriter};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Crée une archive zip dont les entrées sont stockées sans compression.
/// Un nom terminé par `/` crée un répertoire.
pub fn write_zip(dir: &Path, file_name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(file_name);
    let file = File::create(&path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap();
    path
}

/// Écrit une archive zip minimale dont les noms sont des octets arbitraires,
/// sans le drapeau UTF-8, comme le font les anciens outils Windows.
pub fn write_raw_zip(dir: &Path, file_name: &str, entries: &[(&[u8], &[u8])]) -> PathBuf {
    let entries: Vec<(&[u8], &[u8], Option<u64>)> =
        entries.iter().map(|(name, data)| (*name, *data, None)).collect();
    let path = dir.join(file_name);
    std::fs::write(&path, build_zip(&entries)).unwrap();
    path
}

/// Archive d'une seule entrée stockée dont l'en-tête central zip64 annonce
/// `declared` octets décompressés, quel que soit le contenu réel.
pub fn write_zip_declaring_size(
    dir: &Path,
    file_name: &str,
    entry_name: &str,
    data: &[u8],
    declared: u64,
) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, build_zip(&[(entry_name.as_bytes(), data, Some(declared))])).unwrap();
    path
}

fn build_zip(entries: &[(&[u8], &[u8], Option<u64>)]) -> Vec<u8> {
    const DOS_DATE: u16 = 0x0021; // 1980-01-01

    let mut out = Vec::new();
    let mut central = Vec::new();

    for (name, data, declared) in entries {
        let offset = out.len() as u32;
        let crc = crc32fast::hash(data);
        let size = data.len() as u32;
        let version: u16 = if declared.is_some() { 45 } else { 20 };

        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&version.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&DOS_DATE.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(data);

        // Extra zip64 : seule la taille décompressée y figure
        let (uncompressed, extra) = match declared {
            Some(declared) => {
                let mut extra = Vec::new();
                extra.extend_from_slice(&0x0001u16.to_le_bytes());
                extra.extend_from_slice(&8u16.to_le_bytes());
                extra.extend_from_slice(&declared.to_le_bytes());
                (u32::MAX, extra)
            }
            None => (size, Vec::new()),
        };

        central.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        central.extend_from_slice(&version.to_le_bytes());
        central.extend_from_slice(&version.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&DOS_DATE.to_le_bytes());
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&size.to_le_bytes());
        central.extend_from_slice(&uncompressed.to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&(extra.len() as u16).to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u32.to_le_bytes());
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name);
        central.extend_from_slice(&extra);
    }

    let central_offset = out.len() as u32;
    let central_size = central.len() as u32;
    out.extend_from_slice(&central);

    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&central_size.to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// Bloc RAR 4 : CRC (16 bits de poids faible du CRC-32), type, drapeaux, taille
fn rar_block(head_type: u8, flags: u16, body: &[u8]) -> Vec<u8> {
    let mut header = vec![head_type];
    header.extend_from_slice(&flags.to_le_bytes());
    header.extend_from_slice(&((7 + body.len()) as u16).to_le_bytes());
    header.extend_from_slice(body);

    let mut block = ((crc32fast::hash(&header) & 0xFFFF) as u16).to_le_bytes().to_vec();
    block.extend_from_slice(&header);
    block
}

/// Écrit une archive RAR 4 dont les fichiers sont stockés sans compression.
/// Une entrée sans contenu (`None`) est un répertoire.
pub fn write_stored_rar(dir: &Path, file_name: &str, entries: &[(&str, Option<&[u8]>)]) -> PathBuf {
    const HOST_UNIX: u8 = 3;
    const METHOD_STORE: u8 = 0x30;
    const LONG_BLOCK: u16 = 0x8000;
    const DIRECTORY: u16 = 0x00E0;
    const DOS_TIME: u32 = 0x0021_0000; // 1980-01-01 00:00

    let mut out = b"Rar!\x1a\x07\x00".to_vec();
    out.extend(rar_block(0x73, 0, &[0u8; 6]));

    for (name, data) in entries {
        let (flags, content, attr): (u16, &[u8], u32) = match data {
            Some(data) => (LONG_BLOCK, *data, 0o100644),
            None => (LONG_BLOCK | DIRECTORY, &b""[..], 0o040755),
        };
        let crc = if data.is_some() { crc32fast::hash(content) } else { 0 };

        let mut body = Vec::new();
        body.extend_from_slice(&(content.len() as u32).to_le_bytes());
        body.extend_from_slice(&(content.len() as u32).to_le_bytes());
        body.push(HOST_UNIX);
        body.extend_from_slice(&crc.to_le_bytes());
        body.extend_from_slice(&DOS_TIME.to_le_bytes());
        body.push(20);
        body.push(METHOD_STORE);
        body.extend_from_slice(&(name.len() as u16).to_le_bytes());
        body.extend_from_slice(&attr.to_le_bytes());
        body.extend_from_slice(name.as_bytes());

        out.extend(rar_block(0x74, flags, &body));
        out.extend_from_slice(content);
    }
    out.extend(rar_block(0x7B, 0x4000, &[]));

    let path = dir.join(file_name);
    std::fs::write(&path, out).unwrap();
    path
}

/// Écrit une archive 7z (LZMA2) ; une entrée sans contenu est un répertoire.
pub fn write_7z(dir: &Path, file_name: &str, entries: &[(&str, Option<&[u8]>)]) -> PathBuf {
    let staging = tempfile::tempdir().unwrap();
    let path = dir.join(file_name);
    let mut writer = SevenZWriter::create(&path).unwrap();

    for (name, data) in entries {
        let source = staging.path().join(name);
        match data {
            Some(data) => {
                std::fs::create_dir_all(source.parent().unwrap()).unwrap();
                std::fs::write(&source, data).unwrap();
                let entry = SevenZArchiveEntry::from_path(&source, name.to_string());
                writer
                    .push_archive_entry(entry, Some(File::open(&source).unwrap()))
                    .unwrap();
            }
            None => {
                std::fs::create_dir_all(&source).unwrap();
                let entry = SevenZArchiveEntry::from_path(&source, name.to_string());
                writer.push_archive_entry::<&[u8]>(entry, None).unwrap();
            }
        }
    }
    writer.finish().unwrap();
    path
}
