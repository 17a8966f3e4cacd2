//! Extension pour intégrer la gestion des caches dans lcconfig
//!
//! Ce module fournit le trait `CacheConfigExt`, qui ajoute à `lcconfig::Config`
//! la lecture des réglages de cache et la construction des caches configurés.

use anyhow::Result;
use lcconfig::Config;
use serde_yaml::{Number, Value};

use crate::{PageListCache, ThumbnailCache};

pub const THUMBNAIL_CACHE: &str = "thumbnail_cache";
pub const PAGE_LIST_CACHE: &str = "page_list_cache";

pub const DEFAULT_THUMBNAIL_CACHE_DIR: &str = "cache/thumbnail";
pub const DEFAULT_THUMBNAIL_CACHE_SIZE: usize = 4096;
pub const DEFAULT_PAGE_LIST_CACHE_SIZE: usize = 256;

/// Trait d'extension pour ajouter la gestion des caches à lcconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use lcconfig::get_config;
/// use lccache::CacheConfigExt;
///
/// let config = get_config();
/// let thumbnails = config.create_thumbnail_cache()?;
/// thumbnails.load_existing()?;
/// ```
pub trait CacheConfigExt {
    /// Récupère le répertoire d'un cache (créé si nécessaire)
    ///
    /// # Arguments
    ///
    /// * `cache_type` - Type de cache (ex: "thumbnail_cache")
    /// * `default` - Répertoire par défaut si non configuré
    fn get_cache_dir(&self, cache_type: &str, default: &str) -> Result<String>;

    fn set_cache_dir(&self, cache_type: &str, directory: String) -> Result<()>;

    /// Récupère la capacité d'un cache, en nombre d'entrées
    fn get_cache_size(&self, cache_type: &str, default: usize) -> Result<usize>;

    fn set_cache_size(&self, cache_type: &str, size: usize) -> Result<()>;

    /// Construit le cache des miniatures sans charger son contenu
    fn create_thumbnail_cache(&self) -> Result<ThumbnailCache>;

    fn create_page_list_cache(&self) -> Result<PageListCache>;
}

impl CacheConfigExt for Config {
    fn get_cache_dir(&self, cache_type: &str, default: &str) -> Result<String> {
        self.get_managed_dir(&["host", cache_type, "directory"], default)
    }

    fn set_cache_dir(&self, cache_type: &str, directory: String) -> Result<()> {
        self.set_managed_dir(&["host", cache_type, "directory"], directory)
    }

    fn get_cache_size(&self, cache_type: &str, default: usize) -> Result<usize> {
        match self.get_value(&["host", cache_type, "size"]) {
            Ok(Value::Number(n)) => Ok(n.as_u64().map(|v| v as usize).unwrap_or(default)),
            _ => Ok(default),
        }
    }

    fn set_cache_size(&self, cache_type: &str, size: usize) -> Result<()> {
        let n = Number::from(size);
        self.set_value(&["host", cache_type, "size"], Value::Number(n))
    }

    fn create_thumbnail_cache(&self) -> Result<ThumbnailCache> {
        let dir = self.get_cache_dir(THUMBNAIL_CACHE, DEFAULT_THUMBNAIL_CACHE_DIR)?;
        let size = self.get_cache_size(THUMBNAIL_CACHE, DEFAULT_THUMBNAIL_CACHE_SIZE)?;
        Ok(ThumbnailCache::new(dir, size)?)
    }

    fn create_page_list_cache(&self) -> Result<PageListCache> {
        let size = self.get_cache_size(PAGE_LIST_CACHE, DEFAULT_PAGE_LIST_CACHE_SIZE)?;
        Ok(PageListCache::new(size))
    }
}
