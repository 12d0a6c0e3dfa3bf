//! Request tracing middleware.
//

use axum::{extract::Request, Router};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::Middleware;

/// Opens one span per request and logs the response status and latency.
#[derive(Default)]
pub struct TraceMiddleware;

impl TraceMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for TraceMiddleware {
    fn apply(&self, router: Router) -> Router {
        router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "http",
                        component = "server",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
    }
}
