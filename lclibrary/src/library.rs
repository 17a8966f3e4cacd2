//! État partagé par les handlers : racines, caches et lecteurs externes.
//!
//! Toutes les méthodes sont bloquantes (système de fichiers, décompression) ;
//! les handlers les appellent depuis `spawn_blocking`.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use lcarchive::natural_cmp;
use lccache::{CacheConfigExt, PageList, PageListCache, ThumbnailCache, pk_from_path};
use lcconfig::{Config, PlayerHandler, PlayerHandlers};
use lcutils::media::{self, MediaKind};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{LibraryError, Result};
use crate::models::{DirListing, FileItem, FileType};
use crate::resolver::{ResolvedPath, RootRegistry};

/// Première page d'une archive, servie comme miniature
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub data: Vec<u8>,
    pub mime: &'static str,
    /// Vrai si la miniature venait du cache
    pub hit: bool,
}

pub struct Library {
    registry: RootRegistry,
    page_lists: PageListCache,
    thumbnails: ThumbnailCache,
    handlers: PlayerHandlers,
    default_ltr: bool,
    restart: Option<UnboundedSender<()>>,
}

impl Library {
    pub fn new(
        registry: RootRegistry,
        page_lists: PageListCache,
        thumbnails: ThumbnailCache,
        handlers: PlayerHandlers,
    ) -> Self {
        Self {
            registry,
            page_lists,
            thumbnails,
            handlers,
            default_ltr: false,
            restart: None,
        }
    }

    pub fn with_default_ltr(mut self, default_ltr: bool) -> Self {
        self.default_ltr = default_ltr;
        self
    }

    /// Active `POST /api/restart`, qui enverra une demande sur `sender`
    pub fn with_restart(mut self, sender: UnboundedSender<()>) -> Self {
        self.restart = Some(sender);
        self
    }

    /// Construit la bibliothèque depuis la configuration et adopte les
    /// miniatures déjà présentes sur le disque
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let registry = RootRegistry::new(config.get_roots()?);
        for root in registry.roots() {
            tracing::info!("Root {} -> {}", root.name, root.path.display());
        }

        let page_lists = config.create_page_list_cache()?;
        let thumbnails = config.create_thumbnail_cache()?;
        if let Err(e) = thumbnails.load_existing() {
            tracing::warn!(
                "Failed to load thumbnails from {}: {}",
                thumbnails.dir().display(),
                e
            );
        }

        Ok(Self::new(
            registry,
            page_lists,
            thumbnails,
            config.get_player_handlers()?,
        )
        .with_default_ltr(config.get_default_ltr()?))
    }

    pub fn registry(&self) -> &RootRegistry {
        &self.registry
    }

    pub fn page_lists(&self) -> &PageListCache {
        &self.page_lists
    }

    pub fn thumbnails(&self) -> &ThumbnailCache {
        &self.thumbnails
    }

    pub fn default_ltr(&self) -> bool {
        self.default_ltr
    }

    pub fn resolve(&self, request_path: &str) -> Result<ResolvedPath> {
        Ok(self.registry.resolve(request_path)?)
    }

    /// Listing des racines dont le chemin existe
    pub fn list_roots(&self) -> DirListing {
        let files = self
            .registry
            .roots()
            .iter()
            .filter_map(|root| {
                let metadata = fs::metadata(&root.path).ok()?;
                Some(FileItem {
                    name: root.name.clone(),
                    path: root.name.clone(),
                    file_type: FileType::Directory,
                    size: metadata.len(),
                    modified: modified_at(&metadata),
                })
            })
            .collect();

        DirListing {
            root_name: String::new(),
            relative_path: String::new(),
            files,
        }
    }

    /// Contenu d'un répertoire : sous-répertoires d'abord, puis ordre naturel
    pub fn list_dir(&self, resolved: &ResolvedPath) -> Result<DirListing> {
        match fs::metadata(&resolved.full_path) {
            Ok(m) if m.is_dir() => {}
            _ => return Err(LibraryError::NotADirectory(resolved.logical_path())),
        }

        let base = resolved.logical_path();
        let mut files = Vec::new();
        for entry in fs::read_dir(&resolved.full_path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Les liens symboliques sont décrits par leur cible
            let metadata = match fs::metadata(entry.path()).or_else(|_| entry.metadata()) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let file_type = if metadata.is_dir() {
                FileType::Directory
            } else {
                file_type_of(&name)
            };

            files.push(FileItem {
                path: format!("{}/{}", base, name),
                name,
                file_type,
                size: metadata.len(),
                modified: modified_at(&metadata),
            });
        }

        files.sort_by(|a, b| {
            let a_dir = a.file_type == FileType::Directory;
            let b_dir = b.file_type == FileType::Directory;
            match (a_dir, b_dir) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => natural_cmp(&a.name, &b.name),
            }
        });

        Ok(DirListing {
            root_name: resolved.root_name.clone(),
            relative_path: resolved.relative_path.clone(),
            files,
        })
    }

    /// Vérifie que le chemin désigne un fichier ordinaire et retourne sa taille
    pub fn regular_file(&self, resolved: &ResolvedPath) -> Result<u64> {
        match fs::metadata(&resolved.full_path) {
            Ok(m) if m.is_file() => Ok(m.len()),
            Ok(_) => Err(LibraryError::NotAFile(resolved.logical_path())),
            Err(_) => Err(LibraryError::NotFound(resolved.logical_path())),
        }
    }

    /// Pages d'une archive, depuis le cache ou en listant l'archive
    pub fn book_pages(&self, resolved: &ResolvedPath) -> Result<PageList> {
        self.regular_file(resolved)?;
        self.page_lists
            .get_or_load(&resolved.full_path, |path| lcarchive::list_pages(path))
            .map_err(LibraryError::from)
    }

    /// Octets et type MIME de la page `index` (à partir de 0)
    pub fn book_page(
        &self,
        resolved: &ResolvedPath,
        index: usize,
    ) -> Result<(Vec<u8>, &'static str)> {
        let pages = self.book_pages(resolved)?;
        let page = pages
            .get(index)
            .ok_or_else(|| LibraryError::NotFound(format!("page {} (index out of range)", index)))?;

        let data = lcarchive::extract_entry(&resolved.full_path, &page.raw)?;
        Ok((data, media::mime_type(&page.display)))
    }

    /// Miniature d'une archive : sa première page, telle quelle.
    ///
    /// Un échec d'écriture dans le cache n'empêche pas de servir la page.
    pub fn thumbnail(&self, resolved: &ResolvedPath) -> Result<Thumbnail> {
        let pages = self.book_pages(resolved)?;
        let first = pages
            .first()
            .ok_or_else(|| {
                LibraryError::NotFound(format!("images in {}", resolved.logical_path()))
            })?;
        let mime = media::mime_type(&first.display);
        let key = pk_from_path(&resolved.full_path);

        if let Some(data) = self.thumbnails.get(&key) {
            return Ok(Thumbnail { data, mime, hit: true });
        }

        let data = lcarchive::extract_entry(&resolved.full_path, &first.raw)?;
        if let Err(e) = self.thumbnails.put(&key, &data) {
            tracing::warn!(
                "Failed to cache thumbnail for {}: {}",
                resolved.full_path.display(),
                e
            );
        }
        Ok(Thumbnail { data, mime, hit: false })
    }

    /// Premier lecteur externe de `platform` acceptant l'extension de `file_name`
    pub fn player_for(&self, platform: &str, file_name: &str) -> Option<&PlayerHandler> {
        let ext = media::extension_of(file_name);
        if ext.is_empty() {
            return None;
        }
        self.handlers
            .get(platform)?
            .iter()
            .find(|handler| handler.handles(&ext))
    }

    pub fn restart_enabled(&self) -> bool {
        self.restart.is_some()
    }

    /// Demande un redémarrage ; faux si personne n'écoute
    pub fn request_restart(&self) -> bool {
        match &self.restart {
            Some(sender) => sender.send(()).is_ok(),
            None => false,
        }
    }
}

fn file_type_of(name: &str) -> FileType {
    match media::classify(name) {
        MediaKind::Archive => FileType::Book,
        MediaKind::Video => FileType::Video,
        MediaKind::Audio => FileType::Audio,
        MediaKind::Image => FileType::Image,
        MediaKind::Other => FileType::File,
    }
}

fn modified_at(metadata: &fs::Metadata) -> Option<DateTime<Utc>> {
    metadata.modified().ok().map(DateTime::<Utc>::from)
}

/// Plateforme déduite du `User-Agent`, clé de la section `library.handlers`
pub fn detect_platform(user_agent: &str) -> Option<&'static str> {
    let has = |needle: &str| user_agent.contains(needle);
    if has("iPhone") || has("iPad") || has("iPod") {
        Some("ios")
    } else if has("Android") {
        Some("android")
    } else if has("Macintosh") || has("Mac OS X") {
        Some("mac")
    } else if has("Windows") {
        Some("windows")
    } else {
        None
    }
}

/// Fichier ordinaire de type vidéo ou audio
pub fn is_streamable(path: &Path) -> bool {
    path.file_name()
        .map(|n| media::classify(&n.to_string_lossy()).is_streamable_media())
        .unwrap_or(false)
}
