// Local subprocess executor.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::{ExecutionResult, Executor};
use crate::compose::CommandLine;
use crate::config::{Config, ConfigTrait};
use crate::metrics;

/// Runs commands with [`tokio::process::Command`], without a shell.
#[derive(Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
    gate: Option<Arc<Mutex<()>>>,
}

impl ProcessExecutor {
    pub fn new(timeout: Option<Duration>, serialize: bool) -> Self {
        Self {
            timeout,
            gate: serialize.then(|| Arc::new(Mutex::new(()))),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.executor_timeout(), cfg.serialize_executions())
    }

    async fn run(&self, cmd: &CommandLine, cwd: &Path) -> ExecutionResult {
        let child = tokio::process::Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                return ExecutionResult::failed(format!(
                    "failed to execute `{}`: {}",
                    cmd.program, e
                ))
            }
        };

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    return ExecutionResult::failed(format!(
                        "`{}` did not finish within {}",
                        cmd,
                        humantime::format_duration(limit)
                    ))
                }
            },
            None => child.wait_with_output().await,
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                return ExecutionResult::failed(format!(
                    "failed to wait for `{}`: {}",
                    cmd.program, e
                ))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let success = output.status.success();
        let error = if success {
            None
        } else {
            let detail = stderr.trim();
            Some(if detail.is_empty() {
                format!("`{}` exited with {}", cmd, output.status)
            } else {
                format!("`{}` exited with {}: {}", cmd, output.status, detail)
            })
        };

        ExecutionResult {
            stdout,
            stderr,
            success,
            exit_code: output.status.code(),
            error,
        }
    }
}

#[async_trait]
impl Executor for ProcessExecutor {
    async fn execute(&self, cmd: &CommandLine, cwd: &Path) -> ExecutionResult {
        let _guard = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        info!(
            component = "executor",
            event = "started",
            command = %cmd,
            cwd = %cwd.display(),
            "executing command"
        );

        let result = self.run(cmd, cwd).await;

        if result.success {
            if !result.stderr.trim().is_empty() {
                // the orchestration tool reports progress on stderr
                warn!(
                    component = "executor",
                    event = "stderr",
                    command = %cmd,
                    stderr = %result.stderr.trim(),
                    "command wrote to stderr"
                );
            }
            info!(
                component = "executor",
                event = "finished",
                command = %cmd,
                "command succeeded"
            );
            metrics::record_execution(true);
        } else {
            error!(
                component = "executor",
                event = "failed",
                command = %cmd,
                exit_code = ?result.exit_code,
                error = result.error.as_deref().unwrap_or_default(),
                "command failed"
            );
            metrics::record_execution(false);
        }

        result
    }
}
