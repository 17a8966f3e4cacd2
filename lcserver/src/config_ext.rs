//! Extension pour intégrer l'API de configuration de lcconfig dans lcserver
//!
//! Ce module fournit le trait `ConfigExt` qui permet d'ajouter facilement
//! l'API REST de configuration au serveur.

use crate::Server;
use anyhow::Result;
use lcconfig::{ApiDoc, api, get_config};
use utoipa::OpenApi;

/// Trait d'extension pour ajouter l'API de configuration à lcserver
pub trait ConfigExt {
    /// Initialise l'API de configuration et enregistre les routes HTTP
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /api/config` - Récupérer toute la configuration
    /// - `GET /api/config/{path}` - Récupérer une valeur spécifique (ex: host.http_port)
    /// - `POST /api/config` - Mettre à jour une valeur
    /// - `GET /swagger-ui/config` - Documentation interactive Swagger
    ///
    /// Les routes ne sont montées que si `host.enable_settings_api` est vrai.
    ///
    /// # Returns
    ///
    /// `true` si l'API a été montée
    async fn init_config_api(&mut self) -> Result<bool>;
}

impl ConfigExt for Server {
    async fn init_config_api(&mut self) -> Result<bool> {
        let config = get_config();
        if !config.get_enable_settings_api()? {
            tracing::info!("Settings API disabled by configuration");
            return Ok(false);
        }

        let api_router = api::create_router(config);
        let openapi = ApiDoc::openapi();
        self.add_openapi(api_router, openapi, "config").await;

        Ok(true)
    }
}
