use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};
use std::time::SystemTime;

use crate::recency::RecencyIndex;
use crate::CacheStats;

/// Cache disque des miniatures.
///
/// Un fichier par clé, nommé par la clé, sans fichier de métadonnées : la table
/// en mémoire (date d'accès, taille) est reconstruite au démarrage à partir des
/// attributs des fichiers.
#[derive(Debug)]
pub struct ThumbnailCache {
    dir: PathBuf,
    index: RwLock<RecencyIndex<String, u64>>,
}

fn invalid_key(key: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("invalid thumbnail cache key: {:?}", key),
    )
}

/// Une clé doit être un nom de fichier simple
fn validate_key(key: &str) -> io::Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && !key.contains(['/', '\\'])
        && key != "..";
    if valid {
        Ok(())
    } else {
        Err(invalid_key(key))
    }
}

impl ThumbnailCache {
    /// Crée le cache sur `dir` (créé si absent), sans charger son contenu.
    pub fn new(dir: impl Into<PathBuf>, capacity: usize) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            index: RwLock::new(RecencyIndex::new(capacity)),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, RecencyIndex<String, u64>> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adopte les fichiers déjà présents dans le répertoire du cache.
    ///
    /// Les fichiers sont repris du plus ancien au plus récent (date de
    /// modification), sans lire leur contenu. Les fichiers temporaires
    /// (préfixe `.`) laissés par une écriture interrompue sont supprimés.
    ///
    /// # Returns
    ///
    /// Le nombre d'enregistrements en mémoire après chargement
    pub fn load_existing(&self) -> io::Result<usize> {
        let mut found: Vec<(SystemTime, String, u64)> = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            if name.starts_with('.') {
                let _ = fs::remove_file(entry.path());
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            found.push((modified, name, metadata.len()));
        }

        found.sort();

        let mut index = self.write_index();
        for (modified, name, size) in found {
            index.insert_at(name, size, modified);
        }
        let evicted = index.evict_overflow();
        self.remove_files(&evicted);

        tracing::info!(
            directory = %self.dir.display(),
            entries = index.len(),
            evicted = evicted.len(),
            "Loaded existing thumbnails"
        );
        Ok(index.len())
    }

    /// Lit la miniature associée à `key`.
    ///
    /// Si le fichier a disparu ou ne peut être lu, l'enregistrement est
    /// abandonné et l'appel se comporte comme un défaut de cache.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut index = self.write_index();
        let key = key.to_string();
        if !index.contains(&key) {
            return None;
        }

        match fs::read(self.file_path(&key)) {
            Ok(data) => {
                index.touch(&key);
                Some(data)
            }
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Dropping stale thumbnail record");
                index.remove(&key);
                None
            }
        }
    }

    /// Écrit `data` sous `key`, puis enregistre la métadonnée et évince.
    ///
    /// L'écriture passe par un fichier temporaire renommé ensuite : en cas
    /// d'échec, aucun enregistrement n'est créé et l'erreur est retournée.
    pub fn put(&self, key: &str, data: &[u8]) -> io::Result<()> {
        validate_key(key)?;

        let mut index = self.write_index();
        let target = self.file_path(key);
        let temp = self.dir.join(format!(".{}.tmp", key));

        if let Err(e) = fs::write(&temp, data).and_then(|_| fs::rename(&temp, &target)) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }

        index.insert(key.to_string(), data.len() as u64);

        let evicted = index.evict_overflow();
        if !evicted.is_empty() {
            self.remove_files(&evicted);
            tracing::info!(
                "Thumbnail cache eviction: removed {} old entries (cache size: {})",
                evicted.len(),
                index.len()
            );
        }
        Ok(())
    }

    fn remove_files(&self, evicted: &[(String, u64)]) {
        for (key, _) in evicted {
            match fs::remove_file(self.file_path(key)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Failed to delete evicted thumbnail")
                }
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        index.contains(&key.to_string())
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
            total_bytes: Some(index.values().sum()),
        }
    }
}
