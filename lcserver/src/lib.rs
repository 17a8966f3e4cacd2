//! # lcserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate regroupe la plomberie HTTP de LiteComics, indépendante de la
//! bibliothèque servie.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : construction incrémentale du routeur avec [`Server`]
//! - 📚 **Documentation OpenAPI** : Swagger UI par API avec [`Server::add_openapi`]
//! - 📜 **Logs** : buffer circulaire consultable via `/log-dump`, niveau modifiable à chaud
//! - 🎞️ **Requêtes partielles** : réponses `206` avec [`range::stream_file`]
//! - ♻️ **Redémarrage à chaud** : [`Supervisor`] remplace l'instance active après
//!   l'avoir laissée terminer ses requêtes en cours
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use lcserver::{ServerBuilder, Supervisor};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("LiteComics", "localhost", 8539).build();
//!     server
//!         .add_route("/api/hello", || async { serde_json::json!({"hello": "world"}) })
//!         .await;
//!
//!     let mut supervisor = Supervisor::start(&server, Duration::from_secs(10)).await?;
//!     tokio::signal::ctrl_c().await?;
//!     supervisor.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config_ext;
pub mod logs;
pub mod range;
pub mod response;
pub mod server;
pub mod supervisor;

pub use config_ext::ConfigExt;
pub use logs::{LogState, LoggingOptions, BufferLayer, init_logging, log_dump};
pub use range::{ByteRange, RangeError, StreamError, parse_range, serve_bytes, stream_file};
pub use response::ErrorResponse;
pub use server::{RunningServer, Server, ServerBuilder, ServerInfo};
pub use supervisor::Supervisor;
