// Orchestration API application.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{Config, ConfigTrait};
use crate::orchestrator::Orchestrator;
use crate::shutdown::GracefulShutdown;

use super::server::ApiServer;

/// Encapsulates the application state.
#[derive(Clone)]
pub struct App {
    shutdown_token: CancellationToken,
    server: Arc<ApiServer>,
}

impl App {
    pub fn new(shutdown_token: CancellationToken, cfg: Config) -> Result<Self> {
        let orchestrator = Arc::new(Orchestrator::from_config(&cfg));
        Self::with_orchestrator(shutdown_token, cfg, orchestrator)
    }

    pub fn with_orchestrator(
        shutdown_token: CancellationToken,
        cfg: Config,
        orchestrator: Arc<Orchestrator>,
    ) -> Result<Self> {
        info!(
            component = "app",
            event = "configured",
            deploy_root = %orchestrator.workdir().display(),
            docker = cfg.is_docker(),
            "deployment root resolved"
        );
        if !orchestrator.workdir().is_dir() {
            warn!(
                component = "app",
                event = "deploy_root_missing",
                deploy_root = %orchestrator.workdir().display(),
                "deployment root does not exist, orchestration commands will fail"
            );
        }

        let server = Arc::new(ApiServer::new(shutdown_token.clone(), &cfg, orchestrator)?);
        Ok(Self {
            shutdown_token,
            server,
        })
    }

    pub fn router(&self) -> Router {
        self.server.router()
    }

    pub fn is_alive(&self) -> bool {
        self.server.is_alive()
    }

    /// Starts the server in the background and reports to `gsh` when it stops.
    pub async fn serve(&self, gsh: Arc<GracefulShutdown>) -> Result<()> {
        let server = self.server.clone();
        let app = self.clone();

        gsh.add(1);
        tokio::task::spawn(async move {
            if let Err(e) = server.listen_and_serve().await {
                error!(
                    component = "app",
                    scope = "server",
                    event = "serve_failed",
                    error = %e,
                    "server failed to serve"
                );
            }
            app.close();
            gsh.done();
        });

        info!(component = "app", event = "started", "application lifecycle");
        Ok(())
    }

    /// Cancels the shared token, stopping everything bound to it.
    pub fn close(&self) {
        self.shutdown_token.cancel();
        info!(component = "app", event = "stopped", "application lifecycle");
    }
}
