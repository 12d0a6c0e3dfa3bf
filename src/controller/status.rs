// Core container status controller.

use axum::{http::StatusCode, response::Response, routing::get, Router};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::http::render::write_json;
use crate::http::Controller;
use crate::orchestrator::Orchestrator;

use super::READ_TIMEOUT;

pub const STATUS_PATH: &str = "/api/services/status";

#[derive(Clone)]
pub struct StatusController {
    orchestrator: Arc<Orchestrator>,
}

impl StatusController {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    async fn status(orchestrator: Arc<Orchestrator>) -> Response {
        let report = orchestrator.core_services_status().await;
        write_json(StatusCode::OK, &report)
    }
}

impl Controller for StatusController {
    fn add_route(&self, router: Router) -> Router {
        let orchestrator = self.orchestrator.clone();
        let routes = Router::new()
            .route(
                STATUS_PATH,
                get(move || {
                    let orchestrator = orchestrator.clone();
                    async move { Self::status(orchestrator).await }
                }),
            )
            .layer(TimeoutLayer::new(READ_TIMEOUT));
        router.merge(routes)
    }
}
