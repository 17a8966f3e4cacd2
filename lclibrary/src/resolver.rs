//! Résolution des chemins logiques `Racine/sous/chemin` en chemins réels.
//!
//! La résolution est purement lexicale (les liens symboliques ne sont pas
//! suivis) et se fait en deux passes :
//!
//! 1. nettoyage du chemin entier (`.`, `..`, séparateurs répétés), puis le
//!    premier segment désigne la racine et le reste le chemin relatif ; ainsi
//!    `Comics/../Videos/a.mkv` désigne `Videos/a.mkv`
//! 2. comparaison des formes absolues de la racine et du chemin complet ; le
//!    chemin complet doit rester la racine ou l'un de ses descendants
//!
//! Les séparateurs reconnus sont `/` et celui de la plateforme : sous Unix,
//! `\` est un caractère ordinaire de nom de fichier.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use lcconfig::RootConfig;

use crate::error::PathError;

/// Chemin client validé
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub root_name: String,
    /// Segments sous la racine joints par `/` ; vide pour la racine elle-même
    pub relative_path: String,
    pub root_path: PathBuf,
    pub full_path: PathBuf,
}

impl ResolvedPath {
    /// Chemin logique normalisé, tel que l'expose l'API
    pub fn logical_path(&self) -> String {
        if self.relative_path.is_empty() {
            self.root_name.clone()
        } else {
            format!("{}/{}", self.root_name, self.relative_path)
        }
    }

    /// Nom du dernier segment (ou de la racine)
    pub fn file_name(&self) -> String {
        self.full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root_name.clone())
    }
}

/// Table nom de racine → chemin, figée pour la durée de vie d'une instance
#[derive(Debug, Clone, Default)]
pub struct RootRegistry {
    roots: Vec<RootConfig>,
    by_name: HashMap<String, PathBuf>,
}

impl RootRegistry {
    /// Construit la table ; à nom égal, la dernière racine masque les précédentes
    pub fn new(roots: Vec<RootConfig>) -> Self {
        let mut by_name = HashMap::new();
        for root in &roots {
            if by_name
                .insert(root.name.clone(), root.path.clone())
                .is_some()
            {
                tracing::warn!(
                    "Duplicate root name {:?}: {} shadows the previous entry",
                    root.name,
                    root.path.display()
                );
            }
        }
        Self { roots, by_name }
    }

    /// Racines dans l'ordre de la configuration, doublons compris
    pub fn roots(&self) -> &[RootConfig] {
        &self.roots
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.by_name.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn resolve(&self, request_path: &str) -> Result<ResolvedPath, PathError> {
        resolve(self, request_path)
    }
}

/// Résout `request_path` sur les racines de `registry`.
///
/// # Errors
///
/// - [`PathError::InvalidPath`] si le chemin est vide une fois nettoyé
/// - [`PathError::UnknownRoot`] si le premier segment n'est pas une racine connue
/// - [`PathError::PathTraversal`] si le chemin sort de sa racine
///
/// # Exemple
///
/// ```
/// use lclibrary::resolver::{resolve, RootRegistry};
/// use lcconfig::RootConfig;
///
/// let registry = RootRegistry::new(vec![RootConfig::new("Comics", "/srv/comics")]);
/// let resolved = resolve(&registry, "Comics/./Series//Tome 01.cbz").unwrap();
/// assert_eq!(resolved.relative_path, "Series/Tome 01.cbz");
/// assert!(resolve(&registry, "Comics/../../etc/passwd").is_err());
/// ```
pub fn resolve(registry: &RootRegistry, request_path: &str) -> Result<ResolvedPath, PathError> {
    let segments = clean_segments(request_path);

    let (root_name, relative) = segments.split_first().ok_or(PathError::InvalidPath)?;
    // Après nettoyage, `..` ne subsiste qu'en tête
    if *root_name == ".." {
        return Err(PathError::PathTraversal);
    }

    let root_path = registry
        .get(root_name)
        .ok_or_else(|| PathError::UnknownRoot(root_name.to_string()))?;

    let full_path = relative
        .iter()
        .fold(root_path.to_path_buf(), |path, segment| path.join(segment));

    if !is_within(root_path, &full_path) {
        return Err(PathError::PathTraversal);
    }

    Ok(ResolvedPath {
        root_name: root_name.to_string(),
        relative_path: relative.join("/"),
        root_path: root_path.to_path_buf(),
        full_path,
    })
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}

/// Nettoyage lexical à la manière d'un `clean` de chemin : les `.` et les
/// séparateurs vides disparaissent, chaque `..` efface le segment précédent.
/// Un `..` sans prédécesseur est conservé, sauf pour un chemin absolu où il
/// reste à la racine.
fn clean_segments(request_path: &str) -> Vec<&str> {
    let rooted = request_path.starts_with(is_separator);
    let mut segments: Vec<&str> = Vec::new();

    for segment in request_path.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    segments
}

/// Vrai si `path`, une fois absolu et nettoyé, est `root` ou un descendant
fn is_within(root: &Path, path: &Path) -> bool {
    match (absolutize(root), absolutize(path)) {
        (Some(root), Some(path)) => path
            .strip_prefix(&root)
            .map(|rel| {
                rel.components()
                    .all(|c| matches!(c, Component::Normal(_)))
            })
            .unwrap_or(false),
        _ => false,
    }
}

/// Forme absolue lexicale, sans accès au système de fichiers
fn absolutize(path: &Path) -> Option<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };

    let mut clean = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                // `..` à la racine du système reste à la racine
                if !matches!(
                    clean.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_)) | None
                ) {
                    clean.pop();
                }
            }
            Component::CurDir => {}
            other => clean.push(other.as_os_str()),
        }
    }
    Some(clean)
}
