// Liveness probe controller.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};

use crate::http::render::CONTENT_TYPE_JSON;
use crate::http::Controller;

pub const PROBE_PATH: &str = "/healthz";

const SUCCESS_RESPONSE: &str = r#"{
  "status": 200,
  "message": "ok"
}"#;

/// Answers liveness checks while the server accepts requests.
#[derive(Clone, Default)]
pub struct LivenessProbeController;

impl LivenessProbeController {
    pub fn new() -> Self {
        Self
    }

    async fn probe() -> impl IntoResponse {
        (
            StatusCode::OK,
            [("content-type", CONTENT_TYPE_JSON)],
            SUCCESS_RESPONSE,
        )
    }
}

impl Controller for LivenessProbeController {
    fn add_route(&self, router: Router) -> Router {
        router.route(PROBE_PATH, get(Self::probe))
    }
}
