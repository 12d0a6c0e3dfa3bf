//! Operation surface consumed by the admin UI.
//!
//! Every operation returns a structured value; failures below this layer are
//! turned into `success: false` results with a readable error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::compose::{
    is_config_key, CommandBuilder, ComposeAction, ContainerAction, RestartRequest, StackKind,
};
use crate::config::{Config, ConfigTrait};
use crate::contest::ContestActivator;
use crate::envfile::{parse, upsert, FileDocument, KvDocument};
use crate::error::{OrchestratorError, Result};
use crate::executor::{Executor, ProcessExecutor};
use crate::impact;
use crate::locate::Locator;
use crate::metrics;
use crate::policy::PolicyStore;

pub mod containers;
pub mod result;
pub mod status;

pub use result::{
    ContainerInfo, ContainerList, EnvSnapshot, OpResult, RestartAnalysis, ServiceStatus,
    StatusReport,
};

/// Restart kinds accepted from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartKind {
    All,
    Core,
    Admin,
    Contest,
    Worker,
    Custom,
}

impl RestartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartKind::All => "all",
            RestartKind::Core => "core",
            RestartKind::Admin => "admin",
            RestartKind::Contest => "contest",
            RestartKind::Worker => "worker",
            RestartKind::Custom => "custom",
        }
    }

    /// Turns the kind and optional list into a restart request.
    pub fn into_request(self, services: Option<Vec<String>>) -> Result<RestartRequest> {
        let group = |kind: StackKind| -> Result<RestartRequest> { Ok(RestartRequest::Group(kind)) };
        match self {
            RestartKind::All => Ok(RestartRequest::All),
            RestartKind::Core => group(StackKind::Core),
            RestartKind::Admin => group(StackKind::Admin),
            RestartKind::Contest => group(StackKind::Contest),
            RestartKind::Worker => group(StackKind::Worker),
            RestartKind::Custom => match services {
                Some(list) => Ok(RestartRequest::Services(list)),
                None => Err(OrchestratorError::InvalidRequest(
                    "custom restart requires a service list".to_string(),
                )),
            },
        }
    }
}

impl fmt::Display for RestartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestartKind {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(RestartKind::All),
            "core" => Ok(RestartKind::Core),
            "admin" => Ok(RestartKind::Admin),
            "contest" => Ok(RestartKind::Contest),
            "worker" => Ok(RestartKind::Worker),
            "custom" => Ok(RestartKind::Custom),
            other => Err(OrchestratorError::InvalidRequest(format!(
                "unknown restart kind {:?}",
                other
            ))),
        }
    }
}

/// Request-scoped orchestrator. Holds no state between calls: the policy and
/// configuration documents are re-read every time.
pub struct Orchestrator {
    policy: PolicyStore,
    builder: Arc<CommandBuilder>,
    executor: Arc<dyn Executor>,
    locator: Arc<Locator>,
    workdir: PathBuf,
    contest: ContestActivator,
    status_services: Vec<String>,
}

impl Orchestrator {
    /// Wires the orchestrator against the real filesystem and subprocesses.
    pub fn from_config(cfg: &Config) -> Self {
        let executor: Arc<dyn Executor> = Arc::new(ProcessExecutor::from_config(cfg));
        Self::new(cfg, executor, Locator::standard(cfg.deploy_root()))
    }

    pub fn new(cfg: &Config, executor: Arc<dyn Executor>, locator: Locator) -> Self {
        let workdir = cfg.deploy_root();
        let builder = Arc::new(CommandBuilder::new(cfg));
        let locator = Arc::new(locator);
        let contest = ContestActivator::new(
            locator.clone(),
            builder.clone(),
            executor.clone(),
            workdir.clone(),
            cfg.contest_env_file(),
        );

        Self {
            policy: PolicyStore::new(cfg.policy_path()),
            builder,
            executor,
            locator,
            workdir,
            contest,
            status_services: cfg.status_services(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Previews which services a save of `changed_keys` invalidates.
    ///
    /// An unavailable policy means "nothing to restart" and never blocks the save.
    pub async fn analyze_restart_requirements<I, K>(&self, changed_keys: I) -> RestartAnalysis
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let graph = match self.policy.load().await {
            Ok(graph) => graph,
            Err(e) => {
                warn!(
                    component = "orchestrator",
                    event = "policy_unavailable",
                    path = %self.policy.path().display(),
                    error = %e,
                    "restart policy unavailable, assuming no restarts required"
                );
                return RestartAnalysis::default();
            }
        };

        RestartAnalysis {
            required_restarts: impact::analyze(changed_keys, &graph).into_iter().collect(),
        }
    }

    /// Restarts a group, the foundational stack, or an explicit service list.
    pub async fn restart_services(
        &self,
        kind: RestartKind,
        services: Option<Vec<String>>,
    ) -> OpResult {
        let cmd = match kind
            .into_request(services)
            .and_then(|request| self.builder.build(&request))
        {
            Ok(cmd) => cmd,
            Err(e) => {
                metrics::record_rejected();
                warn!(
                    component = "orchestrator",
                    event = "restart_rejected",
                    kind = %kind,
                    error = %e,
                    "restart request rejected"
                );
                return OpResult::failed(e.to_string());
            }
        };

        info!(
            component = "orchestrator",
            event = "restart",
            kind = %kind,
            services = ?cmd.positional(),
            "restarting services"
        );

        let result = self.executor.execute(&cmd, &self.workdir).await;
        if result.success {
            let message = if cmd.positional().is_empty() {
                format!("Services ({}) restarted.", kind)
            } else {
                format!("Services ({}: {}) restarted.", kind, cmd.positional().join(", "))
            };
            OpResult::ok(message).with_output(result.stdout)
        } else {
            let error = result
                .error
                .unwrap_or_else(|| format!("restart of {} services failed", kind));
            OpResult::failed(error).with_output(result.stdout)
        }
    }

    /// Runs a lifecycle action on one group, or on all groups with `None`.
    pub async fn compose_action(&self, action: ComposeAction, group: Option<StackKind>) -> OpResult {
        let cmd = self.builder.action(action, group);
        let result = self.executor.execute(&cmd, &self.workdir).await;
        let target = group.map(|g| g.as_str()).unwrap_or("all");

        if result.success {
            let output = if result.stdout.is_empty() {
                result.stderr
            } else {
                result.stdout
            };
            OpResult::ok(format!("compose {} ({}) finished.", action, target)).with_output(output)
        } else {
            OpResult::failed(
                result
                    .error
                    .unwrap_or_else(|| format!("compose {} ({}) failed", action, target)),
            )
        }
    }

    /// Lists every container known to the engine.
    pub async fn list_containers(&self) -> ContainerList {
        let cmd = self.builder.list_containers();
        let result = self.executor.execute(&cmd, &self.workdir).await;
        if !result.success {
            return ContainerList {
                success: false,
                error: Some(
                    result
                        .error
                        .unwrap_or_else(|| "container listing failed".to_string()),
                ),
                ..ContainerList::default()
            };
        }

        match containers::parse_ps(&result.stdout) {
            Ok(containers) => ContainerList {
                success: true,
                containers,
                error: None,
            },
            Err(e) => {
                warn!(
                    component = "orchestrator",
                    event = "containers_unparsable",
                    error = %e,
                    "unexpected container listing output"
                );
                ContainerList {
                    success: false,
                    error: Some(format!("unexpected container listing output: {}", e)),
                    ..ContainerList::default()
                }
            }
        }
    }

    /// Starts, stops or restarts a single container.
    pub async fn control_container(&self, action: ContainerAction, container: &str) -> OpResult {
        let cmd = match self.builder.container(action, container) {
            Ok(cmd) => cmd,
            Err(e) => {
                metrics::record_rejected();
                warn!(
                    component = "orchestrator",
                    event = "container_rejected",
                    action = %action,
                    error = %e,
                    "container request rejected"
                );
                return OpResult::failed(e.to_string());
            }
        };

        info!(
            component = "orchestrator",
            event = "container_action",
            action = %action,
            container = container,
            "controlling container"
        );

        let result = self.executor.execute(&cmd, &self.workdir).await;
        if result.success {
            OpResult::ok(format!("container {} ({}) finished.", action, container))
                .with_output(result.stdout)
        } else {
            OpResult::failed(
                result
                    .error
                    .unwrap_or_else(|| format!("{} of container {} failed", action, container)),
            )
        }
    }

    /// Sets the active contest and rebuilds the contest group.
    pub async fn switch_contest(&self, contest_id: u64) -> OpResult {
        self.contest.activate(contest_id).await
    }

    /// Reads a configuration document by bare file name.
    pub async fn read_env(&self, file: &str) -> EnvSnapshot {
        let path = match self.resolve_env_file(file) {
            Ok(path) => path,
            Err(e) => {
                return EnvSnapshot {
                    success: false,
                    error: Some(e.to_string()),
                    ..EnvSnapshot::default()
                }
            }
        };

        match FileDocument::new(&path).read().await {
            Ok(content) => EnvSnapshot {
                success: true,
                config: Some(parse(&content)),
                content: Some(content),
                error: None,
            },
            Err(e) => EnvSnapshot {
                success: false,
                error: Some(OrchestratorError::io(format!("read {}", path.display()), e).to_string()),
                ..EnvSnapshot::default()
            },
        }
    }

    /// Sets every key of `updates` in a configuration document, in one write.
    pub async fn update_env(&self, file: &str, updates: &BTreeMap<String, String>) -> OpResult {
        match self.try_update_env(file, updates).await {
            Ok(path) => {
                info!(
                    component = "orchestrator",
                    event = "env_updated",
                    path = %path.display(),
                    keys = ?updates.keys().collect::<Vec<_>>(),
                    "configuration updated"
                );
                OpResult::ok(format!("{} updated.", file))
            }
            Err(e) => OpResult::failed(e.to_string()),
        }
    }

    async fn try_update_env(&self, file: &str, updates: &BTreeMap<String, String>) -> Result<PathBuf> {
        for (key, value) in updates {
            if !is_config_key(key) {
                return Err(OrchestratorError::InvalidRequest(format!(
                    "invalid configuration key {:?}",
                    key
                )));
            }
            if value.contains(['\n', '\r']) {
                return Err(OrchestratorError::InvalidRequest(format!(
                    "value of {} must be a single line",
                    key
                )));
            }
        }

        let path = self.resolve_env_file(file)?;
        let doc = FileDocument::new(&path);
        let mut content = doc
            .read()
            .await
            .map_err(|e| OrchestratorError::io(format!("read {}", path.display()), e))?;

        for (key, value) in updates {
            content = upsert(&content, key, value);
        }

        doc.write_all(&content)
            .await
            .map_err(|e| OrchestratorError::io(format!("write {}", path.display()), e))?;
        Ok(path)
    }

    fn resolve_env_file(&self, file: &str) -> Result<PathBuf> {
        validate_file_name(file)?;
        self.locator.find(file)
    }

    /// Inspects the configured core containers concurrently.
    pub async fn core_services_status(&self) -> StatusReport {
        let checks = self
            .status_services
            .iter()
            .map(|name| status::inspect(&self.builder, self.executor.as_ref(), &self.workdir, name));
        let services = futures::future::join_all(checks).await;

        StatusReport {
            success: true,
            services,
            checked_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Accepts bare file names only.
fn validate_file_name(file: &str) -> Result<()> {
    let bad = file.is_empty()
        || file == "."
        || file == ".."
        || file.contains(['/', '\\', '\0']);
    if bad {
        return Err(OrchestratorError::InvalidRequest(format!(
            "invalid configuration file name {:?}",
            file
        )));
    }
    Ok(())
}
