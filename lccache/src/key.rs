use sha2::{Digest, Sha256};
use std::path::Path;

/// Calcule la clé d'une ressource à partir de son chemin.
///
/// SHA-256 du chemin, tronqué à 16 octets (32 caractères hexadécimaux). La clé
/// sert aussi de nom de fichier dans le cache des miniatures.
///
/// ```
/// use lccache::pk_from_path;
/// use std::path::Path;
///
/// let pk = pk_from_path(Path::new("/srv/comics/Tome 01.cbz"));
/// assert_eq!(pk.len(), 32);
/// assert_eq!(pk, pk_from_path(Path::new("/srv/comics/Tome 01.cbz")));
/// ```
pub fn pk_from_path(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_os_str().as_encoded_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}
