// Middleware interface.

use axum::Router;

/// Wraps a router with a layer.
pub trait Middleware: Send + Sync {
    fn apply(&self, router: Router) -> Router;
}
