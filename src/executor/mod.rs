//! Subprocess execution for orchestration commands.

use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

use crate::compose::CommandLine;

pub mod process;


pub use process::ProcessExecutor;

/// Outcome of one command run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    /// Exit code, absent when the process could not be spawned or was killed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Cause of failure, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Runs a command line to completion in `cwd`.
///
/// Implementations report failures in the result rather than as errors and
/// never retry.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, cmd: &CommandLine, cwd: &Path) -> ExecutionResult;
}
