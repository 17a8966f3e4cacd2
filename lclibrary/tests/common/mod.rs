#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use lccache::{PageListCache, ThumbnailCache};
use lcconfig::{PlayerHandler, PlayerHandlers, RootConfig};
use lclibrary::{Library, RootRegistry, api::create_router};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const PAGE_1: &[u8] = b"\x89PNG first page";
pub const PAGE_2: &[u8] = b"\xff\xd8\xff second page";
pub const PAGE_10: &[u8] = b"\xff\xd8\xff tenth page";

pub fn write_zip(dir: &Path, file_name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(file_name);
    let file = File::create(&path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
    path
}

/// Bibliothèque de test :
///
/// ```text
/// comics/               (racine "Comics")
///   Series/
///     Tome 01.cbz       pages 1.png, 2.jpg, 10.jpg (+ notes.txt)
///   empty.cbz           aucune image
///   broken.cbz          pas une archive
///   movie.mp4           1000 octets
///   song.mp3
///   cover.jpg
///   notes.txt
/// videos/               (racine "Videos")
/// ```
pub struct Fixture {
    pub dir: TempDir,
    pub library: Arc<Library>,
}

impl Fixture {
    pub fn comics(&self) -> PathBuf {
        self.dir.path().join("comics")
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.dir.path().join("thumbs")
    }

    pub fn router(&self) -> Router {
        create_router(self.library.clone())
    }
}

pub fn movie_bytes() -> Vec<u8> {
    (0..1000u32).map(|i| (i % 256) as u8).collect()
}

pub fn default_handlers() -> PlayerHandlers {
    let mut handlers = PlayerHandlers::new();
    handlers.insert(
        "mac".to_string(),
        vec![PlayerHandler {
            name: "IINA".to_string(),
            ext: vec![".mkv".to_string(), ".mp4".to_string()],
            url: "iina://weblink?url={url}".to_string(),
        }],
    );
    handlers.insert(
        "windows".to_string(),
        vec![
            PlayerHandler {
                name: "NoMp4".to_string(),
                ext: vec![".avi".to_string()],
                url: "nomp4://{url}".to_string(),
            },
            PlayerHandler {
                name: "VLC".to_string(),
                ext: vec![".mp4".to_string()],
                url: "vlc://{url}".to_string(),
            },
        ],
    );
    handlers
}

pub fn build_library(dir: &Path, thumbnail_capacity: usize) -> Library {
    let registry = RootRegistry::new(vec![
        RootConfig::new("Comics", dir.join("comics")),
        RootConfig::new("Videos", dir.join("videos")),
    ]);
    let thumbnails = ThumbnailCache::new(dir.join("thumbs"), thumbnail_capacity).unwrap();
    Library::new(registry, PageListCache::new(8), thumbnails, default_handlers())
}

pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let comics = dir.path().join("comics");
    let series = comics.join("Series");
    std::fs::create_dir_all(&series).unwrap();
    std::fs::create_dir_all(dir.path().join("videos")).unwrap();

    write_zip(
        &series,
        "Tome 01.cbz",
        &[
            ("10.jpg", PAGE_10),
            ("notes.txt", b"not a page"),
            ("2.jpg", PAGE_2),
            ("1.png", PAGE_1),
        ],
    );
    write_zip(&comics, "empty.cbz", &[("readme.txt", b"nothing")]);
    std::fs::write(comics.join("broken.cbz"), b"this is not a zip").unwrap();
    std::fs::write(comics.join("movie.mp4"), movie_bytes()).unwrap();
    std::fs::write(comics.join("song.mp3"), b"ID3").unwrap();
    std::fs::write(comics.join("cover.jpg"), b"jpeg").unwrap();
    std::fs::write(comics.join("notes.txt"), b"hello").unwrap();

    let library = Arc::new(build_library(dir.path(), 16));
    Fixture { dir, library }
}
