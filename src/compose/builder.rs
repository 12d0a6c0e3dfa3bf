// Command line construction for the container orchestration tool.

use serde::Serialize;
use std::fmt;
use tracing::warn;

use super::sanitize::{filter_service_ids, is_service_id};
use super::stack::{ComposeAction, ContainerAction, StackKind};
use crate::config::{
    Config, ConfigTrait, DEFAULT_COMPOSE_PROGRAM, DEFAULT_COMPOSE_SUBCOMMAND,
    DEFAULT_CONTAINER_ENGINE,
};
use crate::error::{OrchestratorError, Result};

/// What the caller asked to restart. Constructed per action, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartRequest {
    /// Foundational groups in their fixed order.
    All,
    /// Every service of one group.
    Group(StackKind),
    /// Explicit service names, possibly spread across groups.
    Services(Vec<String>),
}

/// A program and its argument vector. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Trailing positional arguments after the `--` separator.
    pub fn positional(&self) -> &[String] {
        match self.args.iter().position(|a| a == "--") {
            Some(idx) => &self.args[idx + 1..],
            None => &[],
        }
    }
}

/// Rendered for logs only.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Maps restart requests onto orchestration tool invocations.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    subcommand: Option<String>,
    engine: String,
    files: Vec<(StackKind, String)>,
    default_stack: Vec<StackKind>,
}

impl CommandBuilder {
    pub fn new(cfg: &Config) -> Self {
        let compose = cfg.compose();

        let program = compose
            .and_then(|c| c.program.clone())
            .unwrap_or_else(|| DEFAULT_COMPOSE_PROGRAM.to_string());
        let subcommand = match compose.and_then(|c| c.subcommand.as_deref()) {
            Some("") => None,
            Some(sub) => Some(sub.to_string()),
            None => Some(DEFAULT_COMPOSE_SUBCOMMAND.to_string()),
        };
        let engine = compose
            .and_then(|c| c.engine.clone())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTAINER_ENGINE.to_string());

        let configured = compose.and_then(|c| c.files.as_ref());
        let files = StackKind::ALL
            .iter()
            .map(|kind| {
                let file = configured.and_then(|f| match kind {
                    StackKind::Core => f.core.clone(),
                    StackKind::Admin => f.admin.clone(),
                    StackKind::Contest => f.contest.clone(),
                    StackKind::Worker => f.worker.clone(),
                });
                (*kind, file.unwrap_or_else(|| kind.default_file().to_string()))
            })
            .collect();

        let default_stack = compose
            .and_then(|c| c.default_stack.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| StackKind::FOUNDATIONAL.to_vec());

        Self {
            program,
            subcommand,
            engine,
            files,
            default_stack,
        }
    }

    /// Definition file backing `kind`.
    pub fn file(&self, kind: StackKind) -> &str {
        self.files
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, f)| f.as_str())
            .unwrap_or_else(|| kind.default_file())
    }

    /// Builds the rebuild-and-recreate invocation for `request`.
    ///
    /// Explicit service lists reference every known definition file and let
    /// the tool resolve which file owns which name. Names failing the
    /// identifier pattern are dropped; if none remain the request is
    /// rejected, since an empty list would mean "everything".
    pub fn build(&self, request: &RestartRequest) -> Result<CommandLine> {
        match request {
            RestartRequest::All => Ok(self.rebuild(&self.default_stack)),
            RestartRequest::Group(kind) => Ok(self.rebuild(&[*kind])),
            RestartRequest::Services(names) => {
                let (accepted, rejected) = filter_service_ids(names);
                if !rejected.is_empty() {
                    warn!(
                        component = "compose",
                        event = "services_rejected",
                        rejected = ?rejected,
                        "dropped malformed service names from restart request"
                    );
                }
                if accepted.is_empty() {
                    return Err(OrchestratorError::InvalidRestartTarget);
                }

                Ok(self
                    .rebuild(&StackKind::ALL)
                    .arg("--")
                    .args(accepted))
            }
        }
    }

    /// Builds a lifecycle action for one group or, with `None`, for every group.
    pub fn action(&self, action: ComposeAction, group: Option<StackKind>) -> CommandLine {
        let cmd = match group {
            Some(kind) => self.base(&[kind]),
            None => self.base(&StackKind::ALL),
        };
        cmd.arg(action.as_str()).args(action.flags().iter().copied())
    }

    /// Builds a container state probe for `container`.
    pub fn inspect(&self, container: &str) -> Result<CommandLine> {
        let container = single_container(container)?;
        Ok(CommandLine::new(self.engine.clone())
            .arg("inspect")
            .arg("--format")
            .arg("{{.State.Status}}:{{if .State.Health}}{{.State.Health.Status}}{{end}}")
            .arg("--")
            .arg(container))
    }

    /// Lists every container, running or not, one JSON object per line.
    pub fn list_containers(&self) -> CommandLine {
        CommandLine::new(self.engine.clone()).args(["ps", "-a", "--format", "{{json .}}"])
    }

    /// Starts, stops or restarts one container by name or id.
    pub fn container(&self, action: ContainerAction, container: &str) -> Result<CommandLine> {
        let container = single_container(container)?;
        Ok(CommandLine::new(self.engine.clone())
            .arg(action.as_str())
            .arg("--")
            .arg(container))
    }

    fn rebuild(&self, kinds: &[StackKind]) -> CommandLine {
        self.base(kinds).args(["up", "-d", "--build"])
    }

    fn base(&self, kinds: &[StackKind]) -> CommandLine {
        let mut cmd = CommandLine::new(self.program.clone());
        if let Some(sub) = &self.subcommand {
            cmd = cmd.arg(sub.clone());
        }
        for kind in kinds {
            cmd = cmd.arg("-f").arg(self.file(*kind));
        }
        cmd
    }
}

fn single_container(container: &str) -> Result<&str> {
    if is_service_id(container) {
        Ok(container)
    } else {
        Err(OrchestratorError::InvalidRequest(format!(
            "invalid container name {:?}",
            container
        )))
    }
}
