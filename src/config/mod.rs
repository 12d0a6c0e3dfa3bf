// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::compose::StackKind;

pub const PROD: &str = "prod";
pub const DEV: &str = "dev";
pub const TEST: &str = "test";

/// Environment variable which, when set to `true`, switches the deployment
/// root to the in-container mount point.
pub const DEFAULT_DOCKER_FLAG_ENV: &str = "IS_DOCKER";
pub const DEFAULT_DOCKER_ROOT: &str = "/repo-root";
pub const DEFAULT_HOST_ROOT: &str = "..";
pub const DEFAULT_POLICY_PATH: &str = "config/restart-policy.json";
pub const DEFAULT_CONTEST_ENV_FILE: &str = ".env.contest";
pub const DEFAULT_COMPOSE_PROGRAM: &str = "docker";
pub const DEFAULT_COMPOSE_SUBCOMMAND: &str = "compose";
pub const DEFAULT_CONTAINER_ENGINE: &str = "docker";

/// Core containers inspected by the status endpoint when none are configured.
pub const DEFAULT_STATUS_SERVICES: &[&str] = &[
    "cms-database",
    "cms-log-service",
    "cms-resource-service",
    "cms-scoring-service",
    "cms-evaluation-service",
    "cms-proxy-service",
    "cms-checker-service",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Contestops {
    #[serde(rename = "contestops")]
    pub contestops: ContestopsBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContestopsBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub api: Option<Api>,
    pub deploy: Option<Deploy>,
    pub compose: Option<Compose>,
    pub executor: Option<Executor>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Api {
    pub name: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Deploy {
    /// Host-side deployment root, relative paths resolve against the working directory.
    pub root: Option<String>,
    #[serde(rename = "docker_root")]
    pub docker_root: Option<String>,
    #[serde(rename = "docker_flag_env")]
    pub docker_flag_env: Option<String>,
    #[serde(rename = "policy_path")]
    pub policy_path: Option<String>,
    #[serde(rename = "contest_env_file")]
    pub contest_env_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Compose {
    pub program: Option<String>,
    /// Set to an empty string to call a standalone `docker-compose` binary.
    pub subcommand: Option<String>,
    /// Container engine CLI for per-container commands (`inspect`, `ps`, `start`).
    pub engine: Option<String>,
    pub files: Option<ComposeFiles>,
    #[serde(rename = "default_stack")]
    pub default_stack: Option<Vec<StackKind>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ComposeFiles {
    pub core: Option<String>,
    pub admin: Option<String>,
    pub contest: Option<String>,
    pub worker: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Executor {
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub serialize: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Status {
    pub services: Option<Vec<String>>,
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    fn api(&self) -> Option<&Api>;
    fn compose(&self) -> Option<&Compose>;
    fn is_docker(&self) -> bool;
    fn deploy_root(&self) -> PathBuf;
    fn policy_path(&self) -> PathBuf;
    fn contest_env_file(&self) -> &str;
    fn executor_timeout(&self) -> Option<Duration>;
    fn serialize_executions(&self) -> bool;
    fn status_services(&self) -> Vec<String>;
}

// Config type alias for convenience
pub type Config = Contestops;

impl Config {
    fn deploy(&self) -> Option<&Deploy> {
        self.contestops.deploy.as_ref()
    }
}

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.contestops.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.contestops.env == PROD
    }

    fn api(&self) -> Option<&Api> {
        self.contestops.api.as_ref()
    }

    fn compose(&self) -> Option<&Compose> {
        self.contestops.compose.as_ref()
    }

    fn is_docker(&self) -> bool {
        let flag = self
            .deploy()
            .and_then(|d| d.docker_flag_env.as_deref())
            .unwrap_or(DEFAULT_DOCKER_FLAG_ENV);
        std::env::var(flag).map(|v| v == "true").unwrap_or(false)
    }

    fn deploy_root(&self) -> PathBuf {
        if self.is_docker() {
            let root = self
                .deploy()
                .and_then(|d| d.docker_root.as_deref())
                .unwrap_or(DEFAULT_DOCKER_ROOT);
            return PathBuf::from(root);
        }

        let root = self
            .deploy()
            .and_then(|d| d.root.as_deref())
            .unwrap_or(DEFAULT_HOST_ROOT);
        resolve_against_cwd(Path::new(root))
    }

    fn policy_path(&self) -> PathBuf {
        let path = self
            .deploy()
            .and_then(|d| d.policy_path.as_deref())
            .unwrap_or(DEFAULT_POLICY_PATH);
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.deploy_root().join(path)
        }
    }

    fn contest_env_file(&self) -> &str {
        self.deploy()
            .and_then(|d| d.contest_env_file.as_deref())
            .unwrap_or(DEFAULT_CONTEST_ENV_FILE)
    }

    fn executor_timeout(&self) -> Option<Duration> {
        self.contestops.executor.as_ref().and_then(|e| e.timeout)
    }

    fn serialize_executions(&self) -> bool {
        self.contestops
            .executor
            .as_ref()
            .and_then(|e| e.serialize)
            .unwrap_or(false)
    }

    fn status_services(&self) -> Vec<String> {
        match self.contestops.status.as_ref().and_then(|s| s.services.as_ref()) {
            Some(services) => services.clone(),
            None => DEFAULT_STATUS_SERVICES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Resolve absolute path
        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::from_yaml(&data).with_context(|| format!("unmarshal yaml from {:?}", abs_path))
    }

    /// Parses and validates configuration from a YAML string.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data)?;

        if let Some(stack) = cfg.compose().and_then(|c| c.default_stack.as_ref()) {
            if stack.is_empty() {
                anyhow::bail!("compose.default_stack must name at least one service group");
            }
        }

        Ok(cfg)
    }
}

fn resolve_against_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

// Test config is always available for integration tests
mod test_config;
#[allow(dead_code)]
pub use test_config::new_test_config;

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
contestops:
  env: dev
  logs:
    level: info
  api:
    name: contestops
    port: "8030"
  deploy:
    root: /srv/cms
    docker_flag_env: CONTESTOPS_SAMPLE_NEVER_SET
    policy_path: config/restart-policy.json
  compose:
    files:
      core: compose.core.yml
    default_stack: [core, worker]
  executor:
    timeout: 5m
    serialize: true
"#;

    #[test]
    fn test_parse_sample_config() {
        let cfg = Config::from_yaml(SAMPLE).unwrap();

        assert!(!cfg.is_prod());
        assert_eq!(cfg.deploy_root(), PathBuf::from("/srv/cms"));
        assert_eq!(
            cfg.policy_path(),
            PathBuf::from("/srv/cms/config/restart-policy.json")
        );
        assert_eq!(cfg.contest_env_file(), DEFAULT_CONTEST_ENV_FILE);
        assert_eq!(cfg.executor_timeout(), Some(Duration::from_secs(300)));
        assert!(cfg.serialize_executions());
        assert_eq!(
            cfg.compose().and_then(|c| c.default_stack.clone()),
            Some(vec![StackKind::Core, StackKind::Worker])
        );
    }

    #[test]
    fn test_empty_default_stack_is_rejected() {
        let yaml = r#"
contestops:
  env: dev
  compose:
    default_stack: []
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_status_services_fall_back_to_core_containers() {
        let cfg = Config::from_yaml("contestops:\n  env: test\n").unwrap();
        assert_eq!(cfg.status_services().len(), DEFAULT_STATUS_SERVICES.len());
        assert!(!cfg.serialize_executions());
        assert_eq!(cfg.executor_timeout(), None);
    }
}
