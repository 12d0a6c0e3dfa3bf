//! Restart analysis, restart and lifecycle controller.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::compose::{ComposeAction, StackKind};
use crate::http::render::{write_error, write_json};
use crate::http::Controller;
use crate::orchestrator::{Orchestrator, RestartKind};

use super::READ_TIMEOUT;

pub const ANALYZE_PATH: &str = "/api/restart/analyze";
pub const RESTART_PATH: &str = "/api/restart";
pub const COMPOSE_PATH: &str = "/api/compose";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub changed_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RestartBody {
    pub kind: String,
    #[serde(default)]
    pub services: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ComposeBody {
    pub action: ComposeAction,
    /// Every group when absent.
    #[serde(default)]
    pub group: Option<StackKind>,
}

/// RestartController previews and performs service restarts.
#[derive(Clone)]
pub struct RestartController {
    orchestrator: Arc<Orchestrator>,
}

impl RestartController {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    async fn analyze(
        orchestrator: Arc<Orchestrator>,
        body: Result<Json<AnalyzeRequest>, JsonRejection>,
    ) -> Response {
        let Json(req) = match body {
            Ok(body) => body,
            Err(e) => return write_error(StatusCode::BAD_REQUEST, e.body_text()),
        };
        let analysis = orchestrator
            .analyze_restart_requirements(&req.changed_keys)
            .await;
        write_json(StatusCode::OK, &analysis)
    }

    async fn restart(
        orchestrator: Arc<Orchestrator>,
        body: Result<Json<RestartBody>, JsonRejection>,
    ) -> Response {
        let Json(req) = match body {
            Ok(body) => body,
            Err(e) => return write_error(StatusCode::BAD_REQUEST, e.body_text()),
        };
        let kind = match req.kind.parse::<RestartKind>() {
            Ok(kind) => kind,
            Err(e) => return write_error(StatusCode::BAD_REQUEST, e.to_string()),
        };
        let result = orchestrator.restart_services(kind, req.services).await;
        write_json(StatusCode::OK, &result)
    }

    async fn compose(
        orchestrator: Arc<Orchestrator>,
        body: Result<Json<ComposeBody>, JsonRejection>,
    ) -> Response {
        match body {
            Ok(Json(req)) => {
                let result = orchestrator.compose_action(req.action, req.group).await;
                write_json(StatusCode::OK, &result)
            }
            Err(e) => write_error(StatusCode::BAD_REQUEST, e.body_text()),
        }
    }
}

impl Controller for RestartController {
    fn add_route(&self, router: Router) -> Router {
        let analyze = self.orchestrator.clone();
        let restart = self.orchestrator.clone();
        let compose = self.orchestrator.clone();

        let read_only = Router::new()
            .route(
                ANALYZE_PATH,
                post(move |body: Result<Json<AnalyzeRequest>, JsonRejection>| {
                    let orchestrator = analyze.clone();
                    async move { Self::analyze(orchestrator, body).await }
                }),
            )
            .layer(TimeoutLayer::new(READ_TIMEOUT));

        router
            .merge(read_only)
            .route(
                RESTART_PATH,
                post(move |body: Result<Json<RestartBody>, JsonRejection>| {
                    let orchestrator = restart.clone();
                    async move { Self::restart(orchestrator, body).await }
                }),
            )
            .route(
                COMPOSE_PATH,
                post(move |body: Result<Json<ComposeBody>, JsonRejection>| {
                    let orchestrator = compose.clone();
                    async move { Self::compose(orchestrator, body).await }
                }),
            )
    }
}
