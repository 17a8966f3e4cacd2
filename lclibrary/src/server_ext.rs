//! Extension pour monter la bibliothèque sur un `lcserver::Server`

use std::sync::Arc;

use lcserver::Server;
use utoipa::OpenApi;

use crate::api::create_router;
use crate::library::Library;
use crate::openapi::ApiDoc;

/// Trait d'extension pour ajouter l'API de la bibliothèque à lcserver
pub trait LibraryExt {
    /// Enregistre les routes `/api/roots`, `/api/dir`, `/api/book`, `/api/file`,
    /// `/api/media`, `/api/media-url`, `/api/status` (et `/api/restart` si
    /// activé), ainsi que la documentation `/swagger-ui/library`.
    ///
    /// # Exemple
    ///
    /// ```rust,ignore
    /// use lclibrary::{Library, LibraryExt};
    ///
    /// let library = Arc::new(Library::from_config(&get_config())?);
    /// server.init_library(library).await;
    /// ```
    async fn init_library(&mut self, library: Arc<Library>);
}

impl LibraryExt for Server {
    async fn init_library(&mut self, library: Arc<Library>) {
        self.add_router("/", create_router(library)).await;
        self.add_api_docs(ApiDoc::openapi(), "library").await;
    }
}
