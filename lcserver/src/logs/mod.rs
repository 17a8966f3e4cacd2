//! Système de logs : buffer circulaire en mémoire et niveau modifiable à chaud.
//!
//! [`init_logging`] installe une fois par processus un subscriber composé :
//!
//! 1. d'un filtre de niveau rechargeable (`reload::Layer<LevelFilter>`)
//! 2. du [`BufferLayer`], qui conserve les derniers évènements pour `/log-dump`
//! 3. optionnellement d'une sortie console (`fmt`)
//!
//! Le [`LogState`] retourné est partagé par toutes les instances de serveur
//! successives (il survit aux redémarrages à chaud).

mod buffer_layer;

pub use buffer_layer::BufferLayer;

use std::{
    collections::VecDeque,
    sync::{Arc, PoisonError, RwLock},
    time::SystemTime,
};

use anyhow::Context;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use lcconfig::Config;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use crate::response::ErrorResponse;

/// Représente une entrée de log
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// Buffer circulaire partagé
#[derive(Clone)]
pub struct LogState {
    buffer: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
    max_level: Arc<RwLock<Level>>,
    reload_handle: reload::Handle<LevelFilter, Registry>,
}

impl LogState {
    pub fn new(
        capacity: usize,
        level: Level,
        reload_handle: reload::Handle<LevelFilter, Registry>,
    ) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
            max_level: Arc::new(RwLock::new(level)),
            reload_handle,
        }
    }

    /// Change le niveau minimum des évènements enregistrés
    pub fn set_max_level(&self, level: Level) -> anyhow::Result<()> {
        self.reload_handle
            .reload(LevelFilter::from_level(level))
            .context("Failed to reload log level filter")?;
        *self.max_level.write().unwrap_or_else(PoisonError::into_inner) = level;
        Ok(())
    }

    pub fn get_max_level(&self) -> Level {
        *self.max_level.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut buf = self.buffer.write().unwrap_or_else(PoisonError::into_inner);
        while buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(entry);
    }

    pub fn dump(&self) -> Vec<LogEntry> {
        self.buffer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

/// Handler REST (dump JSON du buffer)
pub async fn log_dump(State(state): State<LogState>) -> impl IntoResponse {
    Json(state.dump())
}

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Capacité du buffer circulaire (nombre d'entrées conservées)
    pub buffer_capacity: usize,
    /// Activer la sortie vers stderr/stdout
    pub enable_console: bool,
    /// Niveau minimum au démarrage
    pub min_level: Level,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 1000,
            enable_console: true,
            min_level: Level::INFO,
        }
    }
}

impl LoggingOptions {
    /// Lit la section `host.logger` de la configuration
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            buffer_capacity: config
                .get_log_cache_size()
                .unwrap_or(defaults.buffer_capacity),
            enable_console: config
                .get_log_enable_console()
                .unwrap_or(defaults.enable_console),
            min_level: config
                .get_log_min_level()
                .ok()
                .and_then(|l| string_to_level(&l))
                .unwrap_or(defaults.min_level),
        }
    }
}

/// Initialise le système de logging avec le buffer et optionnellement la console
///
/// # Errors
///
/// Échoue si un subscriber global est déjà installé.
///
/// # Exemple
/// ```rust,no_run
/// use lcserver::logs::{init_logging, LoggingOptions};
///
/// let log_state = init_logging(LoggingOptions::default()).unwrap();
/// ```
pub fn init_logging(options: LoggingOptions) -> anyhow::Result<LogState> {
    let (filter, reload_handle) = reload::Layer::new(LevelFilter::from_level(options.min_level));
    let log_state = LogState::new(options.buffer_capacity, options.min_level, reload_handle);

    // Le filtre rechargeable doit précéder les autres layers
    let subscriber = Registry::default()
        .with(filter)
        .with(BufferLayer::new(log_state.clone()));

    if options.enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        subscriber
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    Ok(log_state)
}

/// Request body pour la configuration du logging
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogSetupRequest {
    pub level: String,
}

/// Response pour la configuration du logging
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LogSetupResponse {
    pub current_level: String,
    pub available_levels: Vec<String>,
}

impl LogSetupResponse {
    fn new(level: Level) -> Self {
        Self {
            current_level: level.to_string(),
            available_levels: ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }
}

/// Handler pour GET /api/log_setup - retourne la configuration actuelle
#[utoipa::path(
    get,
    path = "/api/log_setup",
    responses(
        (
            status = 200,
            description = "Log configuration retrieved successfully",
            body = LogSetupResponse
        )
    ),
    tag = "logs"
)]
pub async fn log_setup_get(State(state): State<LogState>) -> impl IntoResponse {
    Json(LogSetupResponse::new(state.get_max_level()))
}

/// Handler pour POST /api/log_setup - met à jour le niveau de log
#[utoipa::path(
    post,
    path = "/api/log_setup",
    request_body = LogSetupRequest,
    responses(
        (status = 200, description = "Log level updated successfully", body = LogSetupResponse),
        (status = 400, description = "Invalid log level", body = ErrorResponse)
    ),
    tag = "logs"
)]
pub async fn log_setup_post(
    State(state): State<LogState>,
    Json(payload): Json<LogSetupRequest>,
) -> axum::response::Response {
    let Some(level) = string_to_level(&payload.level) else {
        return ErrorResponse::new(
            "INVALID_LEVEL",
            "Invalid log level. Must be one of: ERROR, WARN, INFO, DEBUG, TRACE",
        )
        .with_status(StatusCode::BAD_REQUEST);
    };

    if let Err(e) = state.set_max_level(level) {
        return ErrorResponse::new("LOG_SETUP_FAILED", format!("{:#}", e))
            .with_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
    tracing::info!("Log level changed to: {}", level);

    Json(LogSetupResponse::new(level)).into_response()
}

pub fn string_to_level(s: &str) -> Option<Level> {
    s.trim().parse::<Level>().ok()
}

/// Crée le router pour l'API de gestion des logs
pub fn create_logs_router(log_state: LogState) -> axum::Router {
    use axum::routing::get;
    axum::Router::new()
        .route("/", get(log_setup_get).post(log_setup_post))
        .with_state(log_state)
}

/// API OpenAPI pour la gestion des logs
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        log_setup_get,
        log_setup_post,
    ),
    components(
        schemas(LogSetupRequest, LogSetupResponse, ErrorResponse)
    ),
    tags(
        (name = "logs", description = "Log level configuration endpoints")
    )
)]
pub struct LogsApiDoc;
