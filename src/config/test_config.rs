use super::{Api, Compose, ComposeFiles, Config, ContestopsBox, Deploy, Executor, Logs, Status};

/// Creates a new test configuration.
///
/// The deployment root points at a directory which does not exist, tests
/// replace it with a temporary directory before touching the filesystem.
pub fn new_test_config() -> Config {
    Config {
        contestops: ContestopsBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            api: Some(Api {
                name: Some("contestops:8031".to_string()),
                port: Some("8031".to_string()),
            }),
            deploy: Some(Deploy {
                root: Some("/nonexistent/contestops-test-root".to_string()),
                docker_root: Some("/repo-root".to_string()),
                docker_flag_env: Some("CONTESTOPS_TEST_IS_DOCKER".to_string()),
                policy_path: Some("config/restart-policy.json".to_string()),
                contest_env_file: Some(".env.contest".to_string()),
            }),
            compose: Some(Compose {
                program: Some("docker".to_string()),
                subcommand: Some("compose".to_string()),
                engine: Some("docker".to_string()),
                files: Some(ComposeFiles {
                    core: Some("docker-compose.core.yml".to_string()),
                    admin: Some("docker-compose.admin.yml".to_string()),
                    contest: Some("docker-compose.contest.yml".to_string()),
                    worker: Some("docker-compose.worker.yml".to_string()),
                }),
                default_stack: None,
            }),
            executor: Some(Executor {
                timeout: None,
                serialize: Some(false),
            }),
            status: Some(Status {
                services: Some(vec![
                    "cms-database".to_string(),
                    "cms-log-service".to_string(),
                ]),
            }),
        },
    }
}

impl Config {
    /// Points the deployment root at `root`; used by tests.
    #[allow(dead_code)]
    pub fn with_deploy_root(mut self, root: &std::path::Path) -> Self {
        let deploy = self.contestops.deploy.get_or_insert_with(Deploy::default);
        deploy.root = Some(root.to_string_lossy().into_owned());
        self
    }
}
