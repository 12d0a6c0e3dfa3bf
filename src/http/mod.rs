// HTTP module: server and response rendering.

pub mod render;
pub mod server;

pub use crate::middleware::Middleware;

pub use server::{HttpServer, Server};

// Common controller interface
pub use crate::controller::controller::Controller;
