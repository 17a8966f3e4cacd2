//! # LiteComics Configuration Module
//!
//! This module provides configuration management for LiteComics, including:
//! - Loading configuration from YAML files
//! - Merging with embedded default configuration
//! - Environment variable overrides
//! - Type-safe getters and setters for configuration values
//! - Thread-safe singleton access pattern
//!
//! ## Usage
//!
//! ```no_run
//! use lcconfig::get_config;
//!
//! let config = get_config();
//!
//! let port = config.get_http_port();
//! let roots = config.get_roots()?;
//!
//! config.set_http_port(9000)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use lcutils::guess_local_ip;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::info;

pub mod library;

pub use library::{PlayerHandler, PlayerHandlers, RootConfig};

// Modules conditionnels pour l'API REST
#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "api")]
pub mod openapi;

#[cfg(feature = "api")]
pub use openapi::ApiDoc;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("litecomics.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load LiteComics configuration"));
}

const ENV_CONFIG_DIR: &str = "LITECOMICS_CONFIG";
const ENV_PREFIX: &str = "LITECOMICS_CONFIG__";
const CONFIG_DIR_NAME: &str = ".litecomics";

// Default values for configuration
pub const DEFAULT_HTTP_PORT: u16 = 8539;
const DEFAULT_LOG_BUFFER_CAPACITY: usize = 1000;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;
const DEFAULT_DRAIN_TIMEOUT_SECS: usize = 10;
const DEFAULT_ENABLE_SETTINGS_API: bool = true;
const DEFAULT_LTR: bool = false;

/// Macro to generate getter/setter for usize values with default
macro_rules! impl_usize_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<usize> {
            match self.get_value($path) {
                Ok(Value::Number(n)) => Ok(n.as_u64().map(|v| v as usize).unwrap_or($default)),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, size: usize) -> Result<()> {
            let n = Number::from(size);
            self.set_value($path, Value::Number(n))
        }
    };
}

/// Macro to generate getter/setter for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Configuration manager for LiteComics
///
/// Holds the merged YAML tree (embedded defaults, `config.yaml`, environment
/// overrides) and exposes typed accessors over it.
///
/// # Examples
///
/// ```no_run
/// use lcconfig::get_config;
///
/// let config = get_config();
/// println!("HTTP port: {}", config.get_http_port());
/// ```
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(CONFIG_DIR_NAME).exists() {
            return CONFIG_DIR_NAME.to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        CONFIG_DIR_NAME.to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!(
                "Config path {} is not a directory",
                path.display()
            ));
        }

        // Test write permission
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        fs::read_dir(path)?;

        Ok(())
    }

    /// Determines and validates the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `LITECOMICS_CONFIG` environment variable
    /// 3. `.litecomics` in the current directory
    /// 4. `.litecomics` in the user's home directory
    ///
    /// The directory is created if it doesn't exist, and validated for read/write permissions.
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&dir_path))?;
        Ok(dir_path)
    }

    /// Loads the configuration from the specified directory
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with the external config.yaml file if present
    /// 4. Applies environment variable overrides
    /// 5. Saves the merged configuration
    ///
    /// # Arguments
    ///
    /// * `directory` - The directory containing the config.yaml file, or empty to use defaults
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir=%config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let config_value = Self::read_merged(&path)?;

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        config.save()?;
        Ok(config)
    }

    /// Re-reads `config.yaml` and replaces the in-memory tree.
    ///
    /// Used before a server restart so that edits made through the settings
    /// API or by hand are taken into account.
    pub fn reload(&self) -> Result<()> {
        let value = Self::read_merged(&self.path)?;
        *self.data() = value;
        info!(config_file=%self.path, "Configuration reloaded");
        Ok(())
    }

    fn read_merged(path: &str) -> Result<Value> {
        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let yaml_data = if let Ok(data) = fs::read(path) {
            info!(config_file=%path, "Loaded config file");
            data
        } else {
            info!(config_file=%path, "Config file not found, using default embedded config");
            DEFAULT_CONFIG.as_bytes().to_vec()
        };

        let external_value: Value = serde_yaml::from_slice(&yaml_data)?;
        // Un fichier vide se désérialise en Null : on garde alors les défauts
        if !external_value.is_null() {
            merge_yaml(&mut default_value, &external_value);
        }
        let mut config_value = Self::lower_keys_value(default_value);

        Self::apply_env_overrides(&mut config_value);
        Ok(config_value)
    }

    fn data(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Directory holding `config.yaml`; relative managed directories resolve against it.
    pub fn get_config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Path of the `config.yaml` file backing this configuration.
    pub fn get_config_path(&self) -> &str {
        &self.path
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&*self.data())?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Sets a configuration value at the specified path and saves it
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["host", "http_port"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.data();
            Self::set_value_internal(&mut data, path, value)?;
        }
        self.save()
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key_value = Value::String(path[0].to_lowercase());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["host", "http_port"]`)
    ///
    /// # Returns
    ///
    /// The YAML value, or an error if the path doesn't exist
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                if let Some(next) = map.get(Value::String(key.to_lowercase())) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides(config: &mut Value) {
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let key_path = stripped.split("__").collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                let _ = Self::set_value_internal(config, &key_path, yaml_value);
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        new_map.insert(Value::String(s.to_lowercase()), Self::lower_keys_value(v));
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Résout un chemin relatif ou absolu et crée le répertoire si nécessaire
    fn resolve_and_create_dir(&self, dir_path: &str) -> Result<String> {
        let path = Path::new(dir_path);

        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.config_dir).join(path)
        };

        if !absolute_path.exists() {
            fs::create_dir_all(&absolute_path)?;
            info!(directory=%absolute_path.display(), "Created managed directory");
        }

        Ok(absolute_path.to_string_lossy().to_string())
    }

    /// Récupère un répertoire géré par la configuration
    ///
    /// Le répertoire peut être absolu ou relatif au répertoire de configuration.
    /// Il est créé s'il n'existe pas.
    ///
    /// # Arguments
    ///
    /// * `path` - Chemin dans l'arbre de configuration
    ///   (ex: `&["host", "thumbnail_cache", "directory"]`)
    /// * `default` - Nom de répertoire par défaut si non configuré
    ///
    /// # Returns
    ///
    /// Le chemin absolu du répertoire
    pub fn get_managed_dir(&self, path: &[&str], default: &str) -> Result<String> {
        let dir_path = match self.get_value(path) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => {
                self.set_managed_dir(path, default.to_string())?;
                default.to_string()
            }
        };
        self.resolve_and_create_dir(&dir_path)
    }

    /// Définit un répertoire géré par la configuration
    pub fn set_managed_dir(&self, path: &[&str], directory: String) -> Result<()> {
        self.set_value(path, Value::String(directory))
    }

    /// Gets the base URL (host part) advertised in the startup banner
    ///
    /// Returns the configured value, or the guessed local IP when empty.
    pub fn get_base_url(&self) -> String {
        match self.get_value(&["host", "base_url"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => guess_local_ip(),
        }
    }

    /// Gets the HTTP port from configuration
    ///
    /// Returns the configured HTTP port, or the default port (8539) if not configured or invalid.
    pub fn get_http_port(&self) -> u16 {
        match self.get_value(&["host", "http_port"]) {
            Ok(Value::Number(n)) => match n.as_u64().and_then(|p| u16::try_from(p).ok()) {
                Some(port) => port,
                None => {
                    tracing::warn!(
                        "HTTP port {} out of range, using default {}",
                        n,
                        DEFAULT_HTTP_PORT
                    );
                    DEFAULT_HTTP_PORT
                }
            },
            Ok(Value::String(s)) => match s.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!(
                        "Invalid HTTP port '{}', using default {}",
                        s,
                        DEFAULT_HTTP_PORT
                    );
                    DEFAULT_HTTP_PORT
                }
            },
            Ok(_) => {
                tracing::warn!(
                    "HTTP port not a number or string, using default {}",
                    DEFAULT_HTTP_PORT
                );
                DEFAULT_HTTP_PORT
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to get HTTP port: {}, using default {}",
                    err,
                    DEFAULT_HTTP_PORT
                );
                DEFAULT_HTTP_PORT
            }
        }
    }

    /// Sets the HTTP port in configuration
    pub fn set_http_port(&self, port: u16) -> Result<()> {
        let n = Number::from(port);
        self.set_value(&["host", "http_port"], Value::Number(n))
    }

    impl_usize_config!(
        get_log_cache_size,
        set_log_cache_size,
        &["host", "logger", "buffer_capacity"],
        DEFAULT_LOG_BUFFER_CAPACITY
    );

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    impl_usize_config!(
        get_drain_timeout_secs,
        set_drain_timeout_secs,
        &["host", "drain_timeout_secs"],
        DEFAULT_DRAIN_TIMEOUT_SECS
    );

    impl_bool_config!(
        get_enable_settings_api,
        set_enable_settings_api,
        &["host", "enable_settings_api"],
        DEFAULT_ENABLE_SETTINGS_API
    );

    // Sens de lecture proposé par défaut à la visionneuse (gauche à droite)
    impl_bool_config!(
        get_default_ltr,
        set_default_ltr,
        &["library", "default_ltr"],
        DEFAULT_LTR
    );

    /// Récupère le niveau de log minimum depuis la configuration
    pub fn get_log_min_level(&self) -> Result<String> {
        match self.get_value(&["host", "logger", "min_level"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(DEFAULT_LOG_MIN_LEVEL.to_string()),
        }
    }

    /// Définit le niveau de log minimum dans la configuration
    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }
}

/// Returns the global configuration instance
///
/// The singleton is lazily loaded on first access.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings, keys from `external` are merged recursively into `default`
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
