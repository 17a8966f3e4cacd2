//! # lclibrary - Bibliothèque de médias exposée en HTTP
//!
//! Cette crate assemble les briques de LiteComics en une API :
//!
//! - [`resolver`] : traduction sûre des chemins logiques `Racine/sous/chemin`
//! - [`Library`] : racines, cache des listes de pages, cache des miniatures et
//!   lecteurs externes, partagés par toutes les requêtes d'une instance
//! - [`api`] : handlers Axum (répertoires, archives, fichiers, médias)
//! - [`LibraryExt`] : montage de l'ensemble sur un `lcserver::Server`
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lcconfig::get_config;
//! use lclibrary::{Library, LibraryExt};
//! use lcserver::ServerBuilder;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let library = Arc::new(Library::from_config(&get_config())?);
//! let mut server = ServerBuilder::new_configured("LiteComics").build();
//! server.init_library(library).await;
//! let running = server.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod library;
pub mod models;
pub mod openapi;
pub mod resolver;
mod server_ext;

pub use error::{LibraryError, PathError, Result};
pub use library::{Library, Thumbnail, detect_platform};
pub use openapi::ApiDoc;
pub use resolver::{ResolvedPath, RootRegistry, resolve};
pub use server_ext::LibraryExt;
