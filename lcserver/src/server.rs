//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module fournit une abstraction simple pour construire le routeur pièce par
//! pièce puis le servir, en cachant la configuration d'Axum.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **Routes JSON simples** : Ajoutez des endpoints API avec `add_route()`
//! - 🎯 **Handlers avec état** : `add_handler_with_state()` et `add_router()`
//! - 📚 **Documentation API** : OpenAPI/Swagger automatique avec `add_openapi()`
//! - ⚡ **Arrêt gracieux** : chaque instance démarrée possède son jeton d'arrêt

use crate::logs::{LogState, LogsApiDoc, create_logs_router, log_dump};
use axum::handler::Handler;
use axum::routing::get;
use axum::{Json, Router};
use lcconfig::get_config;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::{sync::RwLock, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Info serveur sérialisable
#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

/// Serveur principal
///
/// Un `Server` n'est qu'une description (routes, port) : chaque appel à
/// [`Server::start`] produit une instance en écoute indépendante.
#[derive(Clone)]
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `base_url` - Hôte annoncé (ex: "192.168.1.10")
    /// * `http_port` - Port HTTP à écouter (0 pour un port libre choisi par le système)
    ///
    /// # Exemple
    ///
    /// ```rust
    /// # use lcserver::Server;
    /// let server = Server::new("MyAPI", "localhost", 3000);
    /// assert_eq!(server.info().http_port, 3000);
    /// ```
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
        }
    }

    pub fn new_configured(name: impl Into<String>) -> Self {
        let config = get_config();
        Self::new(name, config.get_base_url(), config.get_http_port())
    }

    /// Ajoute une route JSON dynamique
    ///
    /// La closure fournie est appelée à chaque requête GET sur le chemin spécifié.
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// # use lcserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "localhost", 3000);
    /// server.add_route("/api/ping", || async {
    ///     serde_json::json!({"status": "online"})
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let f = Arc::new(f);
        let handler = move || {
            let f = f.clone();
            async move { Json(f().await) }
        };

        self.add_router(path, Router::new().route("/", get(handler)))
            .await;
    }

    /// Ajoute un handler GET avec état
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route("/", get(handler)).with_state(state);
        self.add_router(path, route).await;
    }

    /// Ajoute une API documentée avec OpenAPI et Swagger UI
    ///
    /// Chaque appel ajoute une API distincte, avec sa propre documentation :
    ///
    /// - les routes de `api_router` sont servies sous `/api/{name}`
    /// - `/swagger-ui/{name}` affiche la documentation Swagger
    /// - `/api-docs/{name}.json` fournit la spécification OpenAPI
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let base_path = format!("/api/{}", name);
        self.add_router(&base_path, api_router).await;
        self.add_api_docs(openapi, name).await;
    }

    /// Monte uniquement la documentation d'une API dont les routes portent
    /// déjà leur chemin complet
    ///
    /// - `/swagger-ui/{name}` affiche la documentation Swagger
    /// - `/api-docs/{name}.json` fournit la spécification OpenAPI
    pub async fn add_api_docs(&mut self, openapi: utoipa::openapi::OpenApi, name: &str) {
        let swagger_path = format!("/swagger-ui/{}", name);
        let swagger_path_static: &'static str = Box::leak(swagger_path.into_boxed_str());

        let openapi_json_path = format!("/api-docs/{}.json", name);
        let openapi_json_path_static: &'static str = Box::leak(openapi_json_path.into_boxed_str());

        let swagger = SwaggerUi::new(swagger_path_static).url(openapi_json_path_static, openapi);

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(swagger);
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(sub_router)
        } else {
            let normalized = format!("/{}", path.trim_start_matches('/'));
            std::mem::take(&mut *r).nest(&normalized, sub_router)
        };
    }

    /// Enregistre les routes de logs : `/log-dump` et `/api/log_setup`
    ///
    /// Le logging lui-même est initialisé une seule fois par processus avec
    /// [`crate::logs::init_logging`] ; chaque nouvelle instance de serveur ne
    /// fait que monter les routes sur le `LogState` existant.
    pub async fn add_log_routes(&mut self, log_state: LogState) {
        self.add_handler_with_state("/log-dump", log_dump, log_state.clone())
            .await;
        self.add_openapi(
            create_logs_router(log_state),
            LogsApiDoc::openapi(),
            "log_setup",
        )
        .await;
    }

    /// Copie du routeur courant, par exemple pour le tester avec `oneshot`
    pub async fn router(&self) -> Router {
        self.router.read().await.clone()
    }

    /// Réserve le port d'écoute
    ///
    /// Quelques tentatives espacées sont faites : lors d'un remplacement à
    /// chaud, l'instance précédente peut mettre un instant à libérer le port.
    pub async fn bind(&self, attempts: u32) -> anyhow::Result<TcpListener> {
        self.bind_on(self.http_port, attempts).await
    }

    /// Comme [`Server::bind`], sur un port explicite
    pub async fn bind_on(&self, port: u16, attempts: u32) -> anyhow::Result<TcpListener> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let mut attempt = 0;
        loop {
            attempt += 1;
            match TcpListener::bind(addr).await {
                Ok(listener) => return Ok(listener),
                Err(e) if attempt < attempts.max(1) => {
                    warn!("Bind to {} failed (attempt {}): {}, retrying", addr, attempt, e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                Err(e) => {
                    return Err(anyhow::anyhow!("Failed to bind {}: {}", addr, e));
                }
            }
        }
    }

    /// Sert le routeur courant sur `listener` dans une tâche dédiée
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<RunningServer> {
        let addr = listener.local_addr()?;
        let router = self.router().await;
        let token = CancellationToken::new();
        let shutdown = token.clone().cancelled_owned();
        let name = self.name.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!("Server {} stopped with error: {}", name, e);
            }
        });

        info!(
            "Server {} running at http://{}:{}",
            self.name,
            self.base_url,
            addr.port()
        );

        Ok(RunningServer {
            name: self.name.clone(),
            addr,
            token,
            handle,
        })
    }

    /// Démarre le serveur HTTP sur le port configuré
    pub async fn start(&self) -> anyhow::Result<RunningServer> {
        let listener = self.bind(1).await?;
        self.serve(listener).await
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            http_port: self.http_port,
        }
    }
}

/// Instance en écoute produite par [`Server::start`]
pub struct RunningServer {
    name: String,
    addr: SocketAddr,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl RunningServer {
    /// Adresse effective (utile avec le port 0)
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cesse d'accepter de nouvelles connexions ; les requêtes en cours continuent
    pub fn stop_accepting(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Arrête l'instance et attend la fin des requêtes en cours, au plus `timeout`.
    ///
    /// Au-delà, la tâche est interrompue et les connexions restantes coupées.
    ///
    /// # Returns
    ///
    /// `true` si toutes les requêtes se sont terminées à temps
    pub async fn drain(mut self, timeout: Duration) -> bool {
        self.stop_accepting();
        match tokio::time::timeout(timeout, &mut self.handle).await {
            Ok(_) => {
                info!("Server {} on {} drained", self.name, self.addr);
                true
            }
            Err(_) => {
                warn!(
                    "Server {} on {} did not drain within {:?}, aborting",
                    self.name, self.addr, timeout
                );
                self.handle.abort();
                false
            }
        }
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur
    /// * `base_url` - Hôte annoncé
    /// * `http_port` - Port HTTP
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    pub fn new_configured(name: impl Into<String>) -> Self {
        let config = get_config();
        Self {
            name: name.into(),
            base_url: config.get_base_url(),
            http_port: config.get_http_port(),
        }
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}
