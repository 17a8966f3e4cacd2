//! Remplacement à chaud de l'instance HTTP active.
//!
//! Le superviseur détient l'unique référence à l'instance en écoute. Un
//! remplacement se déroule ainsi :
//!
//! 1. la nouvelle instance tente de réserver son port pendant que l'ancienne
//!    sert encore ; si le port est pris (même port), l'ancienne cesse d'accepter
//!    des connexions et la réservation est retentée quelques fois
//! 2. l'ancienne termine ses requêtes en cours, au plus `drain_timeout`,
//!    puis est interrompue
//!
//! Si la nouvelle instance ne peut pas démarrer, l'ancienne reste (ou est
//! remise) en service sur son port.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::server::{RunningServer, Server};

/// Nombre de tentatives de réservation du port lors d'un remplacement
const BIND_ATTEMPTS: u32 = 20;

struct Active {
    server: Server,
    running: RunningServer,
}

pub struct Supervisor {
    current: Option<Active>,
    drain_timeout: Duration,
}

impl Supervisor {
    pub fn new(drain_timeout: Duration) -> Self {
        Self {
            current: None,
            drain_timeout,
        }
    }

    /// Démarre `server` et en prend la supervision
    pub async fn start(server: &Server, drain_timeout: Duration) -> anyhow::Result<Self> {
        let mut supervisor = Self::new(drain_timeout);
        supervisor.replace(server).await?;
        Ok(supervisor)
    }

    /// Adresse de l'instance active
    pub fn addr(&self) -> Option<SocketAddr> {
        self.current.as_ref().map(|active| active.running.addr())
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    /// Remplace l'instance active par une instance de `server`.
    ///
    /// Rend la main une fois l'ancienne instance terminée (ou interrompue).
    ///
    /// # Errors
    ///
    /// Si le nouveau serveur ne peut démarrer, l'erreur est retournée et
    /// l'ancienne instance continue de servir ; [`Supervisor::addr`] vaut
    /// `None` seulement si elle n'a pas pu être remise en service.
    pub async fn replace(&mut self, server: &Server) -> anyhow::Result<SocketAddr> {
        let Some(previous) = self.current.take() else {
            let listener = server.bind(BIND_ATTEMPTS).await?;
            let running = server.serve(listener).await?;
            return Ok(self.install(server, running));
        };

        info!(
            "Replacing server {} on {}",
            previous.running.name(),
            previous.running.addr()
        );

        let mut stopped = false;
        let listener = match server.bind(1).await {
            Ok(listener) => Ok(listener),
            Err(_) => {
                previous.running.stop_accepting();
                stopped = true;
                server.bind(BIND_ATTEMPTS).await
            }
        };
        let started = match listener {
            Ok(listener) => server.serve(listener).await,
            Err(e) => Err(e),
        };

        match started {
            Ok(running) => {
                previous.running.drain(self.drain_timeout).await;
                Ok(self.install(server, running))
            }
            Err(e) => {
                error!("New server failed to start: {:#}", e);
                if stopped {
                    self.restore(previous).await;
                } else {
                    self.current = Some(previous);
                }
                Err(e)
            }
        }
    }

    fn install(&mut self, server: &Server, running: RunningServer) -> SocketAddr {
        let addr = running.addr();
        self.current = Some(Active {
            server: server.clone(),
            running,
        });
        addr
    }

    /// Remet en service le routeur de `previous` sur son ancien port
    async fn restore(&mut self, previous: Active) {
        let port = previous.running.addr().port();
        let restarted = match previous.server.bind_on(port, BIND_ATTEMPTS).await {
            Ok(listener) => previous.server.serve(listener).await,
            Err(e) => Err(e),
        };

        let Active { server, running: stopped } = previous;
        match restarted {
            Ok(running) => {
                warn!("Previous server restored on port {}", port);
                self.current = Some(Active { server, running });
            }
            Err(e) => error!("Failed to restore previous server on port {}: {:#}", port, e),
        }
        stopped.drain(self.drain_timeout).await;
    }

    /// Arrête l'instance active en lui laissant terminer ses requêtes
    ///
    /// # Returns
    ///
    /// `false` si des requêtes ont dû être interrompues
    pub async fn shutdown(&mut self) -> bool {
        match self.current.take() {
            Some(active) => active.running.drain(self.drain_timeout).await,
            None => true,
        }
    }
}
