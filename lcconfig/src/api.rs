use crate::Config;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use serde_yaml::Value;
use std::sync::Arc;

/// Structure pour récupérer une valeur de configuration
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConfigValue {
    /// Chemin de la clé (ex: "host.http_port")
    pub path: String,
    /// Valeur au format JSON
    pub value: JsonValue,
}

/// Structure pour mettre à jour une valeur de configuration
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateConfigRequest {
    /// Chemin de la clé (ex: "library.roots")
    pub path: String,
    /// Nouvelle valeur au format JSON
    pub value: JsonValue,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateConfigResponse {
    pub success: bool,
    pub message: String,
}

/// Erreur API
#[derive(Debug)]
pub struct ApiError(StatusCode, anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.0,
            Json(serde_json::json!({
                "error": if self.0 == StatusCode::NOT_FOUND { "NOT_FOUND" } else { "CONFIG_ERROR" },
                "message": self.1.to_string()
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(StatusCode::INTERNAL_SERVER_ERROR, err.into())
    }
}

/// GET /api/config - Récupérer toute la configuration
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "config",
    responses(
        (status = 200, description = "Configuration complète", body = serde_json::Value)
    )
)]
async fn get_full_config(State(config): State<Arc<Config>>) -> Result<Json<JsonValue>, ApiError> {
    let value = config.get_value(&[])?;
    Ok(Json(yaml_to_json(&value)?))
}

/// GET /api/config/{path} - Récupérer une valeur à un chemin spécifique
#[utoipa::path(
    get,
    path = "/api/config/{path}",
    tag = "config",
    params(
        (
            "path" = String,
            Path,
            description = "Chemin de la configuration (séparé par des points, ex: host.http_port)"
        )
    ),
    responses(
        (status = 200, description = "Valeur de configuration", body = ConfigValue),
        (status = 404, description = "Chemin non trouvé")
    )
)]
async fn get_config_value(
    State(config): State<Arc<Config>>,
    Path(path): Path<String>,
) -> Result<Json<ConfigValue>, ApiError> {
    let path_parts: Vec<&str> = path.split('.').collect();
    let value = config
        .get_value(&path_parts)
        .map_err(|e| ApiError(StatusCode::NOT_FOUND, e))?;

    Ok(Json(ConfigValue {
        value: yaml_to_json(&value)?,
        path,
    }))
}

/// POST /api/config - Mettre à jour une valeur de configuration
///
/// La valeur est persistée immédiatement ; elle ne prend effet qu'au
/// prochain redémarrage du serveur (`POST /api/restart`).
#[utoipa::path(
    post,
    path = "/api/config",
    tag = "config",
    request_body = UpdateConfigRequest,
    responses(
        (status = 200, description = "Configuration mise à jour", body = UpdateConfigResponse)
    )
)]
async fn update_config_value(
    State(config): State<Arc<Config>>,
    Json(request): Json<UpdateConfigRequest>,
) -> Result<Json<UpdateConfigResponse>, ApiError> {
    let path_parts: Vec<&str> = request.path.split('.').collect();
    let yaml_value = json_to_yaml(&request.value)?;

    config.set_value(&path_parts, yaml_value)?;

    Ok(Json(UpdateConfigResponse {
        success: true,
        message: format!("Configuration updated at path: {}", request.path),
    }))
}

fn yaml_to_json(yaml: &Value) -> Result<JsonValue, ApiError> {
    Ok(serde_json::to_value(yaml)?)
}

fn json_to_yaml(json: &JsonValue) -> Result<Value, ApiError> {
    Ok(serde_yaml::to_value(json)?)
}

/// Crée le router API pour la configuration
///
/// Les routes sont relatives : le router est monté sous `/api/config`.
pub fn create_router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/", get(get_full_config).post(update_config_value))
        .route("/{path}", get(get_config_value))
        .with_state(config)
}
