//! Configuration document controller.

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::http::render::{write_error, write_json};
use crate::http::Controller;
use crate::orchestrator::Orchestrator;

use super::READ_TIMEOUT;

pub const ENV_PATH: &str = "/api/env/:file";

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub updates: BTreeMap<String, String>,
}

/// EnvController reads and updates `KEY=value` configuration documents.
#[derive(Clone)]
pub struct EnvController {
    orchestrator: Arc<Orchestrator>,
}

impl EnvController {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    async fn read(orchestrator: Arc<Orchestrator>, file: String) -> Response {
        let snapshot = orchestrator.read_env(&file).await;
        write_json(StatusCode::OK, &snapshot)
    }

    async fn update(
        orchestrator: Arc<Orchestrator>,
        file: String,
        body: Result<Json<UpdateRequest>, JsonRejection>,
    ) -> Response {
        match body {
            Ok(Json(req)) => {
                let result = orchestrator.update_env(&file, &req.updates).await;
                write_json(StatusCode::OK, &result)
            }
            Err(e) => write_error(StatusCode::BAD_REQUEST, e.body_text()),
        }
    }
}

impl Controller for EnvController {
    fn add_route(&self, router: Router) -> Router {
        let read = self.orchestrator.clone();
        let update = self.orchestrator.clone();

        let routes = Router::new()
            .route(
                ENV_PATH,
                get(move |Path(file): Path<String>| {
                    let orchestrator = read.clone();
                    async move { Self::read(orchestrator, file).await }
                })
                .post(
                    move |Path(file): Path<String>,
                          body: Result<Json<UpdateRequest>, JsonRejection>| {
                        let orchestrator = update.clone();
                        async move { Self::update(orchestrator, file, body).await }
                    },
                ),
            )
            .layer(TimeoutLayer::new(READ_TIMEOUT));
        router.merge(routes)
    }
}
