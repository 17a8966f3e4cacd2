//! Corps JSON des réponses de l'API

use chrono::{DateTime, Utc};
use lccache::CacheStats;
use serde::Serialize;
use utoipa::ToSchema;

/// Racine exposée
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RootItem {
    #[schema(example = "Comics")]
    pub name: String,
    #[schema(example = "/srv/comics")]
    pub path: String,
}

/// Nature d'une entrée de répertoire, d'après son extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Directory,
    Book,
    Video,
    Audio,
    Image,
    File,
}

/// Entrée d'un répertoire
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileItem {
    #[schema(example = "Tome 01.cbz")]
    pub name: String,
    /// Chemin logique, préfixé par le nom de la racine
    #[schema(example = "Comics/Series/Tome 01.cbz")]
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirListing {
    pub root_name: String,
    pub relative_path: String,
    pub files: Vec<FileItem>,
}

/// Pages d'une archive, dans l'ordre de lecture
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookList {
    #[schema(example = "Tome 01.cbz")]
    pub filename: String,
    /// Noms d'affichage des pages
    pub images: Vec<String>,
    pub count: usize,
    /// Lecture de gauche à droite par défaut
    #[serde(rename = "defaultLTR")]
    pub default_ltr: bool,
}

/// URL à ouvrir pour lire un média
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MediaUrlResponse {
    pub url: String,
    /// Vrai quand l'URL ouvre un lecteur externe
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub custom: bool,
    /// Nom du lecteur externe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub roots: usize,
    #[schema(value_type = Object)]
    pub page_list_cache: CacheStats,
    #[schema(value_type = Object)]
    pub thumbnail_cache: CacheStats,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestartResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
