//! Classification des fichiers par extension et table des types MIME.
//!
//! Fonctions pures, sans état : seule l'extension finale du nom compte,
//! comparée sans tenir compte de la casse.

use std::path::Path;

const ARCHIVE_EXTENSIONS: &[&str] = &[".cbz", ".zip", ".cbr", ".rar", ".cb7", ".7z", ".epub"];

const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mkv", ".webm", ".avi", ".mov", ".m2ts", ".ts", ".wmv", ".flv", ".mpg", ".mpeg",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    ".mp3", ".flac", ".wav", ".ogg", ".m4a", ".aac", ".wma", ".opus",
];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".avif"];

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Catégorie de contenu déduite de l'extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Archive,
    Video,
    Audio,
    Image,
    Other,
}

impl MediaKind {
    pub fn is_streamable_media(self) -> bool {
        matches!(self, MediaKind::Video | MediaKind::Audio)
    }
}

/// Retourne l'extension en minuscules, point inclus (`".cbz"`), ou une chaîne vide.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

pub fn classify(name: &str) -> MediaKind {
    let ext = extension_of(name);
    let ext = ext.as_str();
    if ARCHIVE_EXTENSIONS.contains(&ext) {
        MediaKind::Archive
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        MediaKind::Audio
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        MediaKind::Image
    } else {
        MediaKind::Other
    }
}

pub fn is_archive(name: &str) -> bool {
    classify(name) == MediaKind::Archive
}

pub fn is_video(name: &str) -> bool {
    classify(name) == MediaKind::Video
}

pub fn is_audio(name: &str) -> bool {
    classify(name) == MediaKind::Audio
}

pub fn is_image(name: &str) -> bool {
    classify(name) == MediaKind::Image
}

/// Type MIME servi pour un nom de fichier.
///
/// Les extensions inconnues tombent sur [`DEFAULT_MIME_TYPE`].
pub fn mime_type(name: &str) -> &'static str {
    match extension_of(name).as_str() {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        ".bmp" => "image/bmp",
        ".avif" => "image/avif",
        ".mp4" => "video/mp4",
        ".mkv" => "video/x-matroska",
        ".webm" => "video/webm",
        ".avi" => "video/x-msvideo",
        ".mov" => "video/quicktime",
        ".m2ts" | ".ts" => "video/mp2t",
        ".wmv" => "video/x-ms-wmv",
        ".flv" => "video/x-flv",
        ".mpg" | ".mpeg" => "video/mpeg",
        ".mp3" => "audio/mpeg",
        ".flac" => "audio/flac",
        ".wav" => "audio/wav",
        ".ogg" => "audio/ogg",
        ".m4a" => "audio/mp4",
        ".aac" => "audio/aac",
        ".wma" => "audio/x-ms-wma",
        ".opus" => "audio/opus",
        _ => DEFAULT_MIME_TYPE,
    }
}
