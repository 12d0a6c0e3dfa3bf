// Contest switch controller.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::http::render::{write_error, write_json};
use crate::http::Controller;
use crate::orchestrator::Orchestrator;

pub const SWITCH_PATH: &str = "/api/contest/switch";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchRequest {
    pub contest_id: u64,
}

/// ContestController switches the active contest.
#[derive(Clone)]
pub struct ContestController {
    orchestrator: Arc<Orchestrator>,
}

impl ContestController {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    async fn switch(
        orchestrator: Arc<Orchestrator>,
        body: Result<Json<SwitchRequest>, JsonRejection>,
    ) -> Response {
        match body {
            Ok(Json(req)) => {
                let result = orchestrator.switch_contest(req.contest_id).await;
                write_json(StatusCode::OK, &result)
            }
            Err(e) => write_error(StatusCode::BAD_REQUEST, e.body_text()),
        }
    }
}

impl Controller for ContestController {
    fn add_route(&self, router: Router) -> Router {
        let orchestrator = self.orchestrator.clone();
        router.route(
            SWITCH_PATH,
            post(move |body: Result<Json<SwitchRequest>, JsonRejection>| {
                let orchestrator = orchestrator.clone();
                async move { Self::switch(orchestrator, body).await }
            }),
        )
    }
}
