//! Contest activation: persist the active contest id, then rebuild the
//! contest service group.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::compose::{CommandBuilder, RestartRequest, StackKind};
use crate::envfile::{append_line, FileDocument, KvDocument};
use crate::executor::Executor;
use crate::locate::Locator;
use crate::metrics;
use crate::orchestrator::OpResult;

#[cfg(test)]
mod activation_test;

/// Key holding the active contest in the contest configuration file.
pub const CONTEST_ID_KEY: &str = "CONTEST_ID";

pub const SWITCHED_MESSAGE: &str = "Contest switched and services restarting...";

static CONTEST_ID_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^CONTEST_ID=\d+").expect("valid contest id pattern"));

/// Rewrites the digits of the first `CONTEST_ID=<digits>` line.
///
/// A line whose value does not start with a digit does not count as a match,
/// so a fresh `CONTEST_ID=<id>` line is appended instead. Whatever follows the
/// digits on a matching line is kept.
pub fn set_contest_id(content: &str, contest_id: u64) -> String {
    let line = format!("{}={}", CONTEST_ID_KEY, contest_id);
    if CONTEST_ID_LINE.is_match(content) {
        CONTEST_ID_LINE
            .replacen(content, 1, NoExpand(&line))
            .into_owned()
    } else {
        append_line(content, &line)
    }
}

/// Switches the active contest.
#[derive(Clone)]
pub struct ContestActivator {
    locator: Arc<Locator>,
    builder: Arc<CommandBuilder>,
    executor: Arc<dyn Executor>,
    workdir: PathBuf,
    env_file: String,
}

impl ContestActivator {
    pub fn new(
        locator: Arc<Locator>,
        builder: Arc<CommandBuilder>,
        executor: Arc<dyn Executor>,
        workdir: PathBuf,
        env_file: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            builder,
            executor,
            workdir,
            env_file: env_file.into(),
        }
    }

    /// Sets `CONTEST_ID` and rebuilds the contest group.
    ///
    /// A failed rebuild does not revert the configuration write.
    pub async fn activate(&self, contest_id: u64) -> OpResult {
        let result = self.run(contest_id).await;
        metrics::record_contest_switch(result.success);
        result
    }

    async fn run(&self, contest_id: u64) -> OpResult {
        let path = match self.locator.find(&self.env_file) {
            Ok(path) => path,
            Err(e) => return OpResult::failed(e.to_string()),
        };

        let doc = FileDocument::new(&path);
        let content = match doc.read().await {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    component = "contest",
                    event = "read_failed",
                    path = %path.display(),
                    error = %e,
                    "failed to read contest configuration"
                );
                return OpResult::failed(format!(
                    "could not read configuration file at {}: {}",
                    path.display(),
                    e
                ));
            }
        };

        let updated = set_contest_id(&content, contest_id);
        if let Err(e) = doc.write_all(&updated).await {
            return OpResult::failed(format!(
                "could not write configuration file at {}: {}",
                path.display(),
                e
            ));
        }

        info!(
            component = "contest",
            event = "config_updated",
            contest_id = contest_id,
            path = %path.display(),
            "active contest persisted"
        );

        let cmd = match self.builder.build(&RestartRequest::Group(StackKind::Contest)) {
            Ok(cmd) => cmd,
            Err(e) => return OpResult::failed(e.to_string()),
        };
        let result = self.executor.execute(&cmd, &self.workdir).await;

        if result.success {
            OpResult::ok(SWITCHED_MESSAGE).with_output(result.stdout)
        } else {
            warn!(
                component = "contest",
                event = "rebuild_failed",
                contest_id = contest_id,
                "contest rebuild failed, configuration change retained"
            );
            let error = result
                .error
                .unwrap_or_else(|| "contest rebuild failed".to_string());
            OpResult::failed(error).with_output(result.stdout)
        }
    }
}
