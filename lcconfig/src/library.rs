//! Section `library` de la configuration : racines exposées et lecteurs externes.
//!
//! Une racine s'écrit soit comme un simple chemin, soit comme `{path, name}` :
//!
//! ```yaml
//! library:
//!   roots:
//!     - /srv/comics
//!     - path: /mnt/nas/videos
//!       name: Videos
//! ```
//!
//! Sans nom explicite, le dernier composant du chemin sert de nom. Une liste vide
//! expose le répertoire personnel sous le nom `Home`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::Config;

const DEFAULT_ROOT_NAME: &str = "Home";

/// Racine configurée : nom public et chemin sur le disque
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootConfig {
    pub name: String,
    pub path: PathBuf,
}

impl RootConfig {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Racine nommée d'après le dernier composant de son chemin
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = default_root_name(&path);
        Self { name, path }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RootEntry {
    Path(String),
    Full {
        path: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<RootEntry> for RootConfig {
    fn from(entry: RootEntry) -> Self {
        match entry {
            RootEntry::Path(path) => RootConfig::from_path(path),
            RootEntry::Full { path, name } => match name {
                Some(name) if !name.is_empty() => RootConfig::new(name, path),
                _ => RootConfig::from_path(path),
            },
        }
    }
}

fn default_root_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Lecteur externe proposé pour certaines extensions (VLC, IINA...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHandler {
    pub name: String,
    #[serde(default)]
    pub ext: Vec<String>,
    /// Gabarit d'URL ; `{url}` est remplacé par l'URL encodée du fichier
    pub url: String,
}

impl PlayerHandler {
    pub fn handles(&self, extension: &str) -> bool {
        self.ext.iter().any(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// Lecteurs par plateforme (`ios`, `android`, `mac`, `windows`), par ordre de priorité
pub type PlayerHandlers = BTreeMap<String, Vec<PlayerHandler>>;

impl Config {
    /// Racines exposées, dans l'ordre de la configuration.
    ///
    /// Les noms en double ne sont pas rejetés ici.
    pub fn get_roots(&self) -> Result<Vec<RootConfig>> {
        let entries: Vec<RootEntry> = match self.get_value(&["library", "roots"]) {
            Ok(Value::Sequence(seq)) => seq
                .into_iter()
                .map(serde_yaml::from_value)
                .collect::<std::result::Result<_, _>>()?,
            _ => Vec::new(),
        };

        let roots: Vec<RootConfig> = entries.into_iter().map(RootConfig::from).collect();
        if roots.is_empty() {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            return Ok(vec![RootConfig::new(DEFAULT_ROOT_NAME, home)]);
        }
        Ok(roots)
    }

    pub fn set_roots(&self, roots: &[RootConfig]) -> Result<()> {
        let seq = roots
            .iter()
            .map(|root| {
                let mut map = serde_yaml::Mapping::new();
                map.insert(
                    Value::String("path".into()),
                    Value::String(root.path.to_string_lossy().to_string()),
                );
                map.insert(Value::String("name".into()), Value::String(root.name.clone()));
                Value::Mapping(map)
            })
            .collect();
        self.set_value(&["library", "roots"], Value::Sequence(seq))
    }

    pub fn get_player_handlers(&self) -> Result<PlayerHandlers> {
        match self.get_value(&["library", "handlers"]) {
            Ok(value @ Value::Mapping(_)) => Ok(serde_yaml::from_value(value)?),
            _ => Ok(PlayerHandlers::new()),
        }
    }
}
