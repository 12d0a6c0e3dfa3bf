//! Best-effort discovery of configuration files.
//!
//! A [`Locator`] walks an ordered list of [`Resolver`]s and returns the first
//! candidate directory that actually contains the requested file.

use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::error::{OrchestratorError, Result};

/// Yields one candidate directory.
pub trait Resolver: Send + Sync {
    fn name(&self) -> &'static str;
    fn candidate(&self) -> Option<PathBuf>;
}

/// The deployment root (in-container mount point or host root).
pub struct DeployRoot(pub PathBuf);

impl Resolver for DeployRoot {
    fn name(&self) -> &'static str {
        "deploy_root"
    }

    fn candidate(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// The process working directory.
pub struct WorkingDir;

impl Resolver for WorkingDir {
    fn name(&self) -> &'static str {
        "working_dir"
    }

    fn candidate(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }
}

/// One level above the working directory, for runs from a nested build output.
pub struct ParentOfWorkingDir;

impl Resolver for ParentOfWorkingDir {
    fn name(&self) -> &'static str {
        "parent_of_working_dir"
    }

    fn candidate(&self) -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .and_then(|cwd| cwd.parent().map(Path::to_path_buf))
    }
}

/// A fixed directory.
pub struct Fixed(pub PathBuf);

impl Resolver for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn candidate(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Ordered resolver chain.
pub struct Locator {
    resolvers: Vec<Box<dyn Resolver>>,
    search_root: PathBuf,
}

impl Locator {
    /// `search_root` is named in the error when nothing is found.
    pub fn new(resolvers: Vec<Box<dyn Resolver>>, search_root: PathBuf) -> Self {
        Self {
            resolvers,
            search_root,
        }
    }

    /// Deployment root, working directory, then its parent.
    pub fn standard(deploy_root: PathBuf) -> Self {
        Self::new(
            vec![
                Box::new(DeployRoot(deploy_root.clone())),
                Box::new(WorkingDir),
                Box::new(ParentOfWorkingDir),
            ],
            deploy_root,
        )
    }

    pub fn search_root(&self) -> &Path {
        &self.search_root
    }

    /// Returns the path of the first existing `<candidate>/<file>`.
    pub fn find(&self, file: &str) -> Result<PathBuf> {
        for resolver in &self.resolvers {
            let Some(dir) = resolver.candidate() else {
                continue;
            };
            let path = dir.join(file);
            if path.is_file() {
                debug!(
                    component = "locate",
                    event = "found",
                    resolver = resolver.name(),
                    path = %path.display(),
                    "configuration file located"
                );
                return Ok(path);
            }
        }

        error!(
            component = "locate",
            event = "not_found",
            file = file,
            root = %self.search_root.display(),
            "configuration file not found in any candidate directory"
        );
        Err(OrchestratorError::ConfigFileNotFound {
            file: file.to_string(),
            root: self.search_root.clone(),
        })
    }
}
