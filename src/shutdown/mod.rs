// Graceful shutdown: wait for a signal, cancel, then wait for registered tasks.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const DEFAULT_GRACEFUL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
#[error("graceful shutdown timeout exceeded")]
pub struct TimeoutError;

/// Counts running tasks and waits for them after cancellation.
#[derive(Clone)]
pub struct GracefulShutdown {
    shutdown_token: CancellationToken,
    timeout: Duration,
    running: Arc<watch::Sender<usize>>,
}

impl GracefulShutdown {
    pub fn new(shutdown_token: CancellationToken) -> Self {
        let (running, _) = watch::channel(0);
        Self {
            shutdown_token,
            timeout: DEFAULT_GRACEFUL_TIMEOUT,
            running: Arc::new(running),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers `n` tasks.
    pub fn add(&self, n: usize) {
        self.running.send_modify(|running| *running += n);
    }

    /// Marks one task as finished.
    pub fn done(&self) {
        self.running
            .send_modify(|running| *running = running.saturating_sub(1));
    }

    pub fn running(&self) -> usize {
        *self.running.borrow()
    }

    /// Waits for SIGINT or cancellation, then for every registered task.
    pub async fn await_shutdown(&self) -> Result<()> {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!(
                    component = "graceful-shutdown",
                    event = "os_signal",
                    signal = "SIGINT",
                    "cancellation started"
                );
            }
            _ = self.shutdown_token.cancelled() => {
                info!(
                    component = "graceful-shutdown",
                    event = "ctx_done",
                    "cancellation started"
                );
            }
        }

        self.cancel_and_await_with_timeout().await
    }

    async fn cancel_and_await_with_timeout(&self) -> Result<()> {
        self.shutdown_token.cancel();

        let mut rx = self.running.subscribe();
        let waited = timeout(self.timeout, rx.wait_for(|running| *running == 0))
            .await
            .map(|_| ());
        match waited {
            Ok(_) => {
                info!(
                    component = "graceful-shutdown",
                    event = "shutdown_success",
                    "service was gracefully shut down"
                );
                Ok(())
            }
            Err(_) => {
                warn!(
                    component = "graceful-shutdown",
                    event = "shutdown_timeout",
                    timeout_secs = self.timeout.as_secs(),
                    running = self.running(),
                    "not all tasks were closed within timeout"
                );
                Err(TimeoutError.into())
            }
        }
    }
}
