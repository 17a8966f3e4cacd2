//! Noms d'entrées : clé brute d'extraction et nom affichable.

use encoding_rs::SHIFT_JIS;

/// Nom d'une entrée d'archive
///
/// `raw` est la clé d'extraction, octet pour octet ; `display` n'est destiné
/// qu'au client et ne doit jamais servir à relire l'archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName {
    pub raw: Vec<u8>,
    pub display: String,
}

impl EntryName {
    pub fn from_raw(raw: Vec<u8>) -> Self {
        let display = display_name(&raw);
        Self { raw, display }
    }
}

/// Rend un nom brut lisible.
///
/// UTF-8 valide : inchangé. Sinon on tente Shift_JIS (archives japonaises
/// créées sous Windows) ; en cas d'échec, rendu UTF-8 avec caractères de
/// remplacement.
pub fn display_name(raw: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(raw) {
        return s.to_string();
    }

    let (decoded, _, had_errors) = SHIFT_JIS.decode(raw);
    if !had_errors {
        return decoded.into_owned();
    }

    String::from_utf8_lossy(raw).into_owned()
}
