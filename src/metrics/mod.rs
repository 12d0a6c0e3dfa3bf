//! Prometheus metrics functionality.
//
//! Counters are no-ops until [`init_prometheus_exporter`] installs the recorder,
//! so one-shot CLI runs and tests never need it.

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// Metric name constants
pub const EXECUTIONS: &str = "contestops_executions_total";
pub const RESTARTS_REJECTED: &str = "contestops_restarts_rejected_total";
pub const CONTEST_SWITCHES: &str = "contestops_contest_switches_total";

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the global Prometheus recorder and keeps its handle for rendering.
pub fn init_prometheus_exporter() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Prometheus handle already initialized"))?;

    Ok(())
}

/// Renders the current metrics snapshot, if the exporter is installed.
pub fn render() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

/// Counts one finished orchestration command.
pub fn record_execution(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!(EXECUTIONS, "outcome" => outcome).increment(1);
}

/// Counts a restart request rejected before anything was spawned.
pub fn record_rejected() {
    ::metrics::counter!(RESTARTS_REJECTED).increment(1);
}

/// Counts a contest activation attempt.
pub fn record_contest_switch(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!(CONTEST_SWITCHES, "outcome" => outcome).increment(1);
}
