// Container state probing.

use std::path::Path;

use super::ServiceStatus;
use crate::compose::CommandBuilder;
use crate::executor::Executor;

pub const STOPPED: &str = "stopped";
pub const HEALTHY: &str = "healthy";
pub const INVALID: &str = "invalid";

pub(super) async fn inspect(
    builder: &CommandBuilder,
    executor: &dyn Executor,
    workdir: &Path,
    name: &str,
) -> ServiceStatus {
    let status = match builder.inspect(name) {
        Ok(cmd) => {
            let result = executor.execute(&cmd, workdir).await;
            if result.success {
                classify(&result.stdout)
            } else {
                STOPPED.to_string()
            }
        }
        Err(_) => INVALID.to_string(),
    };

    ServiceStatus {
        name: name.to_string(),
        status,
    }
}

/// Maps `<state>:<health>` inspect output onto a display status.
///
/// A running container without a health check counts as healthy.
pub fn classify(output: &str) -> String {
    let output = output.trim().trim_matches('\'');
    let (state, health) = output.split_once(':').unwrap_or((output, ""));

    if state == "running" {
        if health.is_empty() || health == HEALTHY {
            HEALTHY.to_string()
        } else {
            health.to_string()
        }
    } else if state.is_empty() {
        STOPPED.to_string()
    } else {
        state.to_string()
    }
}
