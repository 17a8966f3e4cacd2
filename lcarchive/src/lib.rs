//! # lcarchive - Lecture des archives de bandes dessinées
//!
//! Cette crate transforme une archive (CBZ, CBR, CB7, EPUB...) en une liste ordonnée
//! de pages et extrait les octets d'une page donnée.
//!
//! ## Fonctionnalités
//!
//! - 📦 **Trois familles de formats** : zip (`.zip`, `.cbz`, `.epub`), RAR (`.rar`, `.cbr`)
//!   et 7z (`.7z`, `.cb7`), choisies par [`ArchiveFormat`] d'après l'extension
//! - 🔢 **Ordre naturel** : `page2.jpg` avant `page10.jpg` ([`natural_cmp`])
//! - 🈳 **Noms hérités** : les noms non UTF-8 sont décodés en Shift_JIS pour l'affichage,
//!   mais l'extraction utilise toujours les octets d'origine ([`EntryName`])
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use lcarchive::{extract_entry, list_pages};
//! use std::path::Path;
//!
//! let archive = Path::new("/srv/comics/Tome 01.cbz");
//! let pages = list_pages(archive)?;
//! for page in &pages {
//!     let bytes = extract_entry(archive, &page.raw)?;
//!     println!("{} : {} octets", page.display, bytes.len());
//! }
//! # Ok::<(), lcarchive::ArchiveError>(())
//! ```
//!
//! Chaque appel ouvre puis referme l'archive : aucun état n'est partagé entre
//! appels. Les fonctions sont bloquantes et doivent être appelées depuis un
//! thread dédié (par ex. `tokio::task::spawn_blocking`).

mod backend;
pub mod error;
pub mod format;
pub mod names;
pub mod natural;

use std::path::Path;

pub use backend::{ArchiveReader, MAX_ENTRY_BYTES};
pub use error::{ArchiveError, Result};
pub use format::ArchiveFormat;
pub use names::EntryName;
pub use natural::natural_cmp;

/// Entrée brute telle que listée par un backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: Vec<u8>,
    pub is_dir: bool,
}

/// Liste les pages d'une archive dans l'ordre naturel.
///
/// Les répertoires sont ignorés et seules les entrées portant une extension
/// d'image sont retenues.
///
/// # Errors
///
/// - [`ArchiveError::UnsupportedFormat`] si l'extension n'est pas reconnue
/// - [`ArchiveError::OpenFailed`] / [`ArchiveError::ReadFailed`] selon le backend
pub fn list_pages(archive_path: &Path) -> Result<Vec<EntryName>> {
    let format = ArchiveFormat::from_path(archive_path)?;
    let entries = format.reader().list_entries(archive_path)?;

    let mut pages: Vec<EntryName> = entries
        .into_iter()
        .filter(|entry| !entry.is_dir)
        .map(|entry| EntryName::from_raw(entry.name))
        .filter(|name| lcutils::media::is_image(&name.display))
        .collect();

    pages.sort_by(|a, b| {
        natural_cmp(&a.display, &b.display).then_with(|| a.raw.cmp(&b.raw))
    });

    tracing::debug!(
        archive = %archive_path.display(),
        format = format.as_str(),
        pages = pages.len(),
        "Listed archive pages"
    );
    Ok(pages)
}

/// Extrait les octets décompressés de l'entrée dont le nom brut vaut `raw_name`.
///
/// La comparaison est exacte, octet par octet.
///
/// # Errors
///
/// [`ArchiveError::EntryNotFound`] si aucune entrée ne correspond.
pub fn extract_entry(archive_path: &Path, raw_name: &[u8]) -> Result<Vec<u8>> {
    let format = ArchiveFormat::from_path(archive_path)?;
    format.reader().extract(archive_path, raw_name)
}
