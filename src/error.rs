//! Error taxonomy of the restart orchestrator.

use std::path::PathBuf;

/// Failures produced below the operation surface. The facade converts every
/// variant into a structured result, none of them escape as panics.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Policy document is missing or corrupt; callers degrade to "restart nothing".
    #[error("restart policy unavailable at {}: {reason}", path.display())]
    PolicyUnavailable { path: PathBuf, reason: String },

    #[error("could not find {file} in {} or its fallbacks", root.display())]
    ConfigFileNotFound { file: String, root: PathBuf },

    /// Explicit service list sanitized down to nothing.
    #[error("no valid service names left in restart request")]
    InvalidRestartTarget,

    #[error("{0}")]
    ExecutionFailure(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl OrchestratorError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
