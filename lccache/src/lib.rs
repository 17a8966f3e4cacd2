//! # lccache - Caches bornés de LiteComics
//!
//! Deux caches à capacité fixe, évincés selon la date du dernier accès :
//!
//! - [`PageListCache`] : en mémoire, associe le chemin d'une archive à sa liste de
//!   pages ordonnée pour éviter de rouvrir l'archive à chaque requête
//! - [`ThumbnailCache`] : sur disque, associe une clé dérivée du chemin de l'archive
//!   ([`pk_from_path`]) aux octets de la première page ; survit aux redémarrages
//!   grâce à [`ThumbnailCache::load_existing`]
//!
//! ## Politique d'éviction
//!
//! Toute lecture réussie (`get`) rafraîchit la date d'accès. Quand une insertion
//! fait dépasser la capacité, tous les enregistrements sont triés par date d'accès
//! et les plus anciens sont retirés. Les dates proviennent d'une horloge logique
//! strictement croissante : deux accès ne sont jamais ex æquo.
//!
//! `get` modifiant la date d'accès, il prend le verrou en écriture dans les deux
//! caches ; seules les consultations pures (`len`, `contains`, `stats`) se
//! contentent du verrou en lecture.
//!
//! ## Limite connue
//!
//! La clé d'une miniature ne dépend que du chemin : si le fichier change sur le
//! disque, l'ancienne miniature reste servie jusqu'à son éviction.

mod key;
mod page_list;
mod recency;
mod thumbnail;

#[cfg(feature = "lcconfig")]
pub mod config_ext;

pub use key::pk_from_path;
pub use page_list::{PageList, PageListCache};
pub use recency::RecencyIndex;
pub use thumbnail::ThumbnailCache;

#[cfg(feature = "lcconfig")]
pub use config_ext::CacheConfigExt;

/// Photographie de l'occupation d'un cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    /// Taille cumulée des fichiers, pour les caches sur disque
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<u64>,
}
