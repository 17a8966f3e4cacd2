//! # lcutils - Utilitaires partagés de LiteComics
//!
//! ## Fonctionnalités
//!
//! - 🗂️ **Classification par extension** : [`media::classify`] range un nom de fichier
//!   dans une catégorie (archive, vidéo, audio, image) et [`media::mime_type`] donne
//!   le type MIME servi au client
//! - 🌐 **Adresses réseau** : [`guess_local_ip`] et [`list_local_ips`] pour afficher
//!   les URLs d'accès au démarrage
//!
//! ```
//! use lcutils::media::{classify, mime_type, MediaKind};
//!
//! assert_eq!(classify("Vol.01.CBZ"), MediaKind::Archive);
//! assert_eq!(mime_type("clip.mkv"), "video/x-matroska");
//! ```

mod ip_utils;
pub mod media;

pub use ip_utils::{guess_local_ip, list_local_ips};
pub use media::{MediaKind, classify, mime_type};
