use std::sync::Arc;
use std::time::Duration;

use lcconfig::{Config, get_config};
use lclibrary::{Library, LibraryExt};
use lcserver::{
    ConfigExt, LogState, LoggingOptions, Server, ServerBuilder, Supervisor, init_logging,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{error, info, warn};

/// Assemble une instance de serveur à partir de la configuration courante
async fn build_server(
    config: Arc<Config>,
    log_state: &LogState,
    restart: UnboundedSender<()>,
) -> anyhow::Result<Server> {
    let settings_api = config.get_enable_settings_api()?;

    // Lecture des racines et adoption des miniatures existantes
    let library = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || Library::from_config(&config)).await??
    };
    let library = if settings_api {
        library.with_restart(restart)
    } else {
        library
    };

    let mut server = ServerBuilder::new_configured("LiteComics").build();
    server.add_log_routes(log_state.clone()).await;
    server.init_config_api().await?;
    server.init_library(Arc::new(library)).await;
    Ok(server)
}

fn print_banner(port: u16) {
    info!("✅ LiteComics is ready!");
    info!("   http://localhost:{}", port);
    for ip in lcutils::list_local_ips() {
        info!("   http://{}:{}", ip, port);
    }
    info!("Press Ctrl+C to stop...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========

    let config = get_config();
    let log_state = init_logging(LoggingOptions::from_config(&config))?;
    info!("📁 Configuration loaded from {}", config.get_config_path());

    // ========== PHASE 2 : Bibliothèque et routes ==========

    let (restart_tx, mut restart_rx) = mpsc::unbounded_channel();
    info!("📚 Loading library...");
    let server = build_server(config.clone(), &log_state, restart_tx.clone()).await?;

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    let drain_timeout = Duration::from_secs(config.get_drain_timeout_secs()? as u64);
    let mut supervisor = Supervisor::start(&server, drain_timeout).await?;
    if let Some(addr) = supervisor.addr() {
        print_banner(addr.port());
    }

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Ctrl+C received, shutting down gracefully");
                break;
            }
            Some(()) = restart_rx.recv() => {
                info!("♻️ Restarting server with reloaded configuration...");
                if let Err(e) = config.reload() {
                    warn!("⚠️ Failed to reload configuration, keeping current server: {:#}", e);
                    continue;
                }
                let rebuilt = build_server(config.clone(), &log_state, restart_tx.clone()).await;
                let server = match rebuilt {
                    Ok(server) => server,
                    Err(e) => {
                        warn!("⚠️ Failed to rebuild server, keeping current one: {:#}", e);
                        continue;
                    }
                };
                match supervisor.replace(&server).await {
                    Ok(addr) => info!("✅ Server restarted on port {}", addr.port()),
                    Err(e) if supervisor.addr().is_some() => {
                        error!("❌ Restart failed, previous server kept: {:#}", e);
                    }
                    Err(e) => {
                        return Err(e.context("no server left listening after a failed restart"));
                    }
                }
            }
        }
    }

    if !supervisor.shutdown().await {
        warn!("Some requests were interrupted during shutdown");
    }
    Ok(())
}
