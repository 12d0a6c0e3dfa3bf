// HTTP server wiring for the orchestration API.

use anyhow::Result;
use axum::Router;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::http::{Controller, HttpServer, Middleware};
use crate::orchestrator::Orchestrator;

/// Server with every controller and middleware attached.
pub struct ApiServer {
    server: Arc<HttpServer>,
    is_server_alive: Arc<AtomicBool>,
}

impl ApiServer {
    pub fn new(ctx: CancellationToken, cfg: &Config, orchestrator: Arc<Orchestrator>) -> Result<Self> {
        let controllers = Self::controllers(cfg, orchestrator);
        let middlewares = Self::middlewares();
        let server = HttpServer::new(ctx, cfg.clone(), controllers, middlewares)?;

        Ok(Self {
            server,
            is_server_alive: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn is_alive(&self) -> bool {
        self.is_server_alive.load(Ordering::Relaxed)
    }

    pub fn router(&self) -> Router {
        self.server.router()
    }

    /// Serves until shutdown (blocking call).
    pub async fn listen_and_serve(&self) -> Result<()> {
        self.is_server_alive.store(true, Ordering::Relaxed);
        let result = self.server.listen_and_serve().await;
        self.is_server_alive.store(false, Ordering::Relaxed);
        result
    }

    fn controllers(cfg: &Config, orchestrator: Arc<Orchestrator>) -> Vec<Box<dyn Controller>> {
        use crate::controller;

        vec![
            // Healthcheck probe endpoint
            Box::new(controller::LivenessProbeController::new()),
            // Metrics endpoint
            Box::new(controller::PrometheusMetricsController::new()),
            // Encodes and shows current config as json
            Box::new(controller::ShowConfigController::new(cfg.clone())),
            // Restart preview and restarts
            Box::new(controller::RestartController::new(orchestrator.clone())),
            // Active contest switch
            Box::new(controller::ContestController::new(orchestrator.clone())),
            // KEY=value configuration documents
            Box::new(controller::EnvController::new(orchestrator.clone())),
            // Core container health
            Box::new(controller::StatusController::new(orchestrator.clone())),
            // Per-container listing and lifecycle
            Box::new(controller::ContainerController::new(orchestrator)),
        ]
    }

    fn middlewares() -> Vec<Box<dyn Middleware>> {
        vec![Box::new(crate::middleware::TraceMiddleware::new())]
    }
}
