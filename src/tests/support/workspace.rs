// Temporary deployment root with a policy document and a contest env file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use super::executor::RecordingExecutor;
use crate::config::{new_test_config, Config};
use crate::locate::{Fixed, Locator};
use crate::orchestrator::Orchestrator;

pub const POLICY: &str = r#"{
  "dependencies": {
    "db": ["api"],
    "api": ["contest-web"],
    "contest-web": ["api"]
  },
  "env_triggers": {
    "DB_PASSWORD": ["db"],
    "CONTESTS_DEPLOY_CONFIG": ["contest-stack"],
    "WORKER_COUNT": ["worker"]
  }
}"#;

pub const CONTEST_ENV: &str = "# contest stack\nDB_HOST=cms-database\nCONTEST_ID=1\nCONTESTS_DEPLOY_CONFIG=single\n";

pub struct Workspace {
    dir: TempDir,
    pub cfg: Config,
}

impl Workspace {
    /// Deployment root with the default policy and contest env file.
    pub fn new() -> Self {
        let ws = Self::empty();
        ws.write("config/restart-policy.json", POLICY);
        ws.write(".env.contest", CONTEST_ENV);
        ws
    }

    /// Deployment root with nothing in it.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cfg = new_test_config().with_deploy_root(dir.path());
        Self { dir, cfg }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write fixture");
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("read fixture")
    }

    /// Orchestrator whose resolver chain only looks at this workspace.
    pub fn orchestrator(&self, executor: Arc<RecordingExecutor>) -> Orchestrator {
        let locator = Locator::new(
            vec![Box::new(Fixed(self.root().to_path_buf()))],
            self.root().to_path_buf(),
        );
        Orchestrator::new(&self.cfg, executor, locator)
    }
}
