// Config display controller.

use axum::{http::StatusCode, response::Response, routing::get, Router};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::config::Config;
use crate::http::render::write_json;
use crate::http::Controller;

use super::READ_TIMEOUT;

pub const CONFIG_PATH: &str = "/api/config";

/// ShowConfigController displays the loaded configuration.
pub struct ShowConfigController {
    cfg: Arc<Config>,
}

impl ShowConfigController {
    pub fn new(cfg: Config) -> Self {
        Self { cfg: Arc::new(cfg) }
    }

    async fn show_config(cfg: Arc<Config>) -> Response {
        write_json(StatusCode::OK, &*cfg)
    }
}

impl Controller for ShowConfigController {
    fn add_route(&self, router: Router) -> Router {
        let cfg = self.cfg.clone();
        let routes = Router::new()
            .route(
                CONFIG_PATH,
                get(move || {
                    let cfg = cfg.clone();
                    async move { Self::show_config(cfg).await }
                }),
            )
            .layer(TimeoutLayer::new(READ_TIMEOUT));
        router.merge(routes)
    }
}
