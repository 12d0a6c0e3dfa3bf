//! Per-container listing and lifecycle controller.

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::compose::ContainerAction;
use crate::http::render::{write_error, write_json};
use crate::http::Controller;
use crate::orchestrator::Orchestrator;

use super::READ_TIMEOUT;

pub const CONTAINERS_PATH: &str = "/api/containers";
pub const CONTAINER_PATH: &str = "/api/containers/:id";

#[derive(Debug, Deserialize)]
pub struct ContainerBody {
    pub action: ContainerAction,
}

/// ContainerController lists containers and starts, stops or restarts one.
#[derive(Clone)]
pub struct ContainerController {
    orchestrator: Arc<Orchestrator>,
}

impl ContainerController {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    async fn list(orchestrator: Arc<Orchestrator>) -> Response {
        let list = orchestrator.list_containers().await;
        write_json(StatusCode::OK, &list)
    }

    async fn control(
        orchestrator: Arc<Orchestrator>,
        id: String,
        body: Result<Json<ContainerBody>, JsonRejection>,
    ) -> Response {
        match body {
            Ok(Json(req)) => {
                let result = orchestrator.control_container(req.action, &id).await;
                write_json(StatusCode::OK, &result)
            }
            Err(e) => write_error(StatusCode::BAD_REQUEST, e.body_text()),
        }
    }
}

impl Controller for ContainerController {
    fn add_route(&self, router: Router) -> Router {
        let list = self.orchestrator.clone();
        let control = self.orchestrator.clone();

        let read_only = Router::new()
            .route(
                CONTAINERS_PATH,
                get(move || {
                    let orchestrator = list.clone();
                    async move { Self::list(orchestrator).await }
                }),
            )
            .layer(TimeoutLayer::new(READ_TIMEOUT));

        router.merge(read_only).route(
            CONTAINER_PATH,
            post(
                move |Path(id): Path<String>, body: Result<Json<ContainerBody>, JsonRejection>| {
                    let orchestrator = control.clone();
                    async move { Self::control(orchestrator, id, body).await }
                },
            ),
        )
    }
}
