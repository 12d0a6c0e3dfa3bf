// Application assembly: orchestrator, controllers and server.

#[allow(clippy::module_inception)]
pub mod app;
pub mod server;

pub use app::App;
pub use server::ApiServer;
