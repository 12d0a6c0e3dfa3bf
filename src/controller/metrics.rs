//! Metrics controller.

use axum::{http::StatusCode, response::Response, routing::get, Router};

use crate::http::render::write_text;
use crate::http::Controller;
use crate::metrics;

pub const PROMETHEUS_METRICS_PATH: &str = "/metrics";

/// Exposes the Prometheus text format.
#[derive(Default)]
pub struct PrometheusMetricsController;

impl PrometheusMetricsController {
    pub fn new() -> Self {
        Self
    }

    async fn get_metrics() -> Response {
        match metrics::render() {
            Some(body) => write_text(StatusCode::OK, body),
            None => write_text(
                StatusCode::SERVICE_UNAVAILABLE,
                "# prometheus recorder is not installed\n".to_string(),
            ),
        }
    }
}

impl Controller for PrometheusMetricsController {
    fn add_route(&self, router: Router) -> Router {
        router.route(PROMETHEUS_METRICS_PATH, get(Self::get_metrics))
    }
}
