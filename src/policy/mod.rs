//! Restart policy store.
//!
//! The policy document is a static JSON file with two maps:
//!
//! ```json
//! {
//!   "dependencies": { "db": ["api"] },
//!   "env_triggers": { "DB_PASSWORD": ["db"] }
//! }
//! ```
//!
//! `dependencies[A] = [B]` reads as "if A restarts, B must restart too".
//! The document is re-read on every load so edits are picked up without a
//! restart of this service.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{OrchestratorError, Result};

/// Name of one logical service managed by the orchestration tool.
pub type ServiceId = String;

/// Name half of a persisted `KEY=value` setting.
pub type ConfigKey = String;

/// Immutable snapshot of the restart policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolicyGraph {
    /// Services which must also restart when the key service restarts.
    #[serde(rename = "dependencies", default)]
    pub dependents: HashMap<ServiceId, BTreeSet<ServiceId>>,
    /// Services directly invalidated by a configuration key change.
    #[serde(rename = "env_triggers", default)]
    pub env_triggers: HashMap<ConfigKey, BTreeSet<ServiceId>>,
}

impl PolicyGraph {
    /// Parses a policy document.
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// Services directly triggered by `key`.
    pub fn triggered_by(&self, key: &str) -> Option<&BTreeSet<ServiceId>> {
        self.env_triggers.get(key)
    }

    /// Services which must restart alongside `service`.
    pub fn dependents_of(&self, service: &str) -> Option<&BTreeSet<ServiceId>> {
        self.dependents.get(service)
    }
}

/// Loads the policy graph from durable storage.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    path: PathBuf,
}

impl PolicyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the policy document.
    ///
    /// A missing or corrupt document yields [`OrchestratorError::PolicyUnavailable`];
    /// callers treat it as "no restart required".
    pub async fn load(&self) -> Result<PolicyGraph> {
        let data = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            OrchestratorError::PolicyUnavailable {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        let graph = PolicyGraph::from_json(&data).map_err(|e| {
            OrchestratorError::PolicyUnavailable {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        debug!(
            component = "policy",
            event = "loaded",
            path = %self.path.display(),
            triggers = graph.env_triggers.len(),
            dependencies = graph.dependents.len(),
            "restart policy loaded"
        );

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_default_to_empty() {
        let graph = PolicyGraph::from_json(r#"{"env_triggers": {"DB_PASSWORD": ["db"]}}"#).unwrap();
        assert!(graph.dependents.is_empty());
        assert_eq!(
            graph.triggered_by("DB_PASSWORD").map(|s| s.len()),
            Some(1)
        );
        assert!(graph.dependents_of("db").is_none());
    }

    #[tokio::test]
    async fn test_load_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restart-policy.json");
        std::fs::write(
            &path,
            r#"{"dependencies": {"db": ["api"]}, "env_triggers": {"DB_PASSWORD": ["db"]}}"#,
        )
        .unwrap();

        let graph = PolicyStore::new(&path).load().await.unwrap();
        assert!(graph.dependents_of("db").unwrap().contains("api"));
    }

    #[tokio::test]
    async fn test_missing_document_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = PolicyStore::new(dir.path().join("absent.json"));

        match store.load().await {
            Err(OrchestratorError::PolicyUnavailable { path, .. }) => {
                assert_eq!(path, dir.path().join("absent.json"));
            }
            other => panic!("expected PolicyUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_corrupt_document_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restart-policy.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            PolicyStore::new(&path).load().await,
            Err(OrchestratorError::PolicyUnavailable { .. })
        ));
    }
}
