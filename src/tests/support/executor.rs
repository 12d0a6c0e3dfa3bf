// Recording executor for tests that must not spawn real processes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::compose::CommandLine;
use crate::executor::{ExecutionResult, Executor};

/// Records every command and answers with queued results (success by default).
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(CommandLine, PathBuf)>>,
    replies: Mutex<VecDeque<ExecutionResult>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result returned by the next call.
    pub fn reply(&self, result: ExecutionResult) -> &Self {
        self.replies.lock().unwrap().push_back(result);
        self
    }

    pub fn reply_ok(&self, stdout: &str) -> &Self {
        self.reply(ExecutionResult {
            stdout: stdout.to_string(),
            success: true,
            exit_code: Some(0),
            ..ExecutionResult::default()
        })
    }

    pub fn reply_failure(&self, error: &str) -> &Self {
        self.reply(ExecutionResult {
            stderr: error.to_string(),
            exit_code: Some(1),
            ..ExecutionResult::failed(error)
        })
    }

    pub fn calls(&self) -> Vec<(CommandLine, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<CommandLine> {
        self.calls().into_iter().map(|(cmd, _)| cmd).collect()
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(&self, cmd: &CommandLine, cwd: &Path) -> ExecutionResult {
        self.calls
            .lock()
            .unwrap()
            .push((cmd.clone(), cwd.to_path_buf()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ExecutionResult {
                success: true,
                exit_code: Some(0),
                ..ExecutionResult::default()
            })
    }
}
