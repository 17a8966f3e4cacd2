use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use lcarchive::EntryName;

use crate::recency::RecencyIndex;
use crate::CacheStats;

/// Liste de pages partagée entre requêtes
pub type PageList = Arc<Vec<EntryName>>;

/// Cache en mémoire des listes de pages, indexé par chemin d'archive.
///
/// Non persistant : un redémarrage repart d'un cache vide.
#[derive(Debug)]
pub struct PageListCache {
    index: RwLock<RecencyIndex<PathBuf, PageList>>,
}

impl PageListCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            index: RwLock::new(RecencyIndex::new(capacity)),
        }
    }

    /// Retourne la liste en cache et rafraîchit sa date d'accès.
    pub fn get(&self, archive_path: &Path) -> Option<PageList> {
        let mut index = self.index.write().unwrap_or_else(PoisonError::into_inner);
        index.touch(&archive_path.to_path_buf()).cloned()
    }

    /// Insère (ou remplace) la liste puis évince au-delà de la capacité.
    pub fn put(&self, archive_path: PathBuf, pages: Vec<EntryName>) -> PageList {
        let pages: PageList = Arc::new(pages);
        let mut index = self.index.write().unwrap_or_else(PoisonError::into_inner);
        index.insert(archive_path, pages.clone());

        let evicted = index.evict_overflow();
        if !evicted.is_empty() {
            tracing::debug!(
                "Page list cache eviction: removed {} old entries (cache size: {})",
                evicted.len(),
                index.len()
            );
        }
        pages
    }

    /// Sert depuis le cache ou appelle `load` puis mémorise le résultat.
    ///
    /// `load` s'exécute hors verrou : deux requêtes simultanées sur la même
    /// archive peuvent toutes deux la lister, la seconde écrasant la première.
    pub fn get_or_load<E, F>(&self, archive_path: &Path, load: F) -> Result<PageList, E>
    where
        F: FnOnce(&Path) -> Result<Vec<EntryName>, E>,
    {
        if let Some(pages) = self.get(archive_path) {
            return Ok(pages);
        }
        let pages = load(archive_path)?;
        Ok(self.put(archive_path.to_path_buf(), pages))
    }

    pub fn contains(&self, archive_path: &Path) -> bool {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        index.contains(&archive_path.to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.index.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            entries: index.len(),
            capacity: index.capacity(),
            total_bytes: None,
        }
    }
}
