// HTTP API controllers for the orchestration endpoints.

pub mod config;
pub mod container;
pub mod contest;
pub mod controller;
pub mod env;
pub mod metrics;
pub mod probe;
pub mod restart;
pub mod status;

pub use config::ShowConfigController;
pub use container::ContainerController;
pub use contest::ContestController;
pub use env::EnvController;
pub use metrics::PrometheusMetricsController;
pub use probe::LivenessProbeController;
pub use restart::RestartController;
pub use status::StatusController;

use std::time::Duration;

/// Upper bound for read-only requests. Restart and switch requests run
/// until the orchestration command returns.
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);
