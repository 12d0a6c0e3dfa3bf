// Integration tests for restart analysis and restart execution.

use std::sync::Arc;

use crate::compose::ComposeAction;
use crate::orchestrator::RestartKind;
use crate::support::{RecordingExecutor, Workspace};

/// A credential change invalidates the database and everything depending on it.
#[tokio::test]
async fn test_analyze_follows_dependencies() {
    let ws = Workspace::new();
    let orchestrator = ws.orchestrator(Arc::new(RecordingExecutor::new()));

    let analysis = orchestrator
        .analyze_restart_requirements(["DB_PASSWORD"])
        .await;

    assert_eq!(analysis.required_restarts, vec!["api", "contest-web", "db"]);
}

#[tokio::test]
async fn test_analyze_merges_several_keys() {
    let ws = Workspace::new();
    let orchestrator = ws.orchestrator(Arc::new(RecordingExecutor::new()));

    let analysis = orchestrator
        .analyze_restart_requirements(["WORKER_COUNT", "CONTESTS_DEPLOY_CONFIG", "UNKNOWN"])
        .await;

    assert_eq!(analysis.required_restarts, vec!["contest-stack", "worker"]);
}

/// Missing or malformed policy never blocks a save: the preview is empty.
#[tokio::test]
async fn test_analyze_without_usable_policy() {
    let ws = Workspace::empty();
    let orchestrator = ws.orchestrator(Arc::new(RecordingExecutor::new()));
    assert!(orchestrator
        .analyze_restart_requirements(["DB_PASSWORD"])
        .await
        .required_restarts
        .is_empty());

    ws.write("config/restart-policy.json", "{ not json");
    assert!(orchestrator
        .analyze_restart_requirements(["DB_PASSWORD"])
        .await
        .required_restarts
        .is_empty());
}

/// The policy is re-read on every call.
#[tokio::test]
async fn test_analyze_sees_policy_edits() {
    let ws = Workspace::new();
    let orchestrator = ws.orchestrator(Arc::new(RecordingExecutor::new()));
    assert!(orchestrator
        .analyze_restart_requirements(["ADMIN_PORT"])
        .await
        .required_restarts
        .is_empty());

    ws.write(
        "config/restart-policy.json",
        r#"{"env_triggers": {"ADMIN_PORT": ["admin-web"]}}"#,
    );
    assert_eq!(
        orchestrator
            .analyze_restart_requirements(["ADMIN_PORT"])
            .await
            .required_restarts,
        vec!["admin-web"]
    );
}

#[tokio::test]
async fn test_restart_core_group() {
    let ws = Workspace::new();
    let executor = Arc::new(RecordingExecutor::new());
    let orchestrator = ws.orchestrator(executor.clone());

    let result = orchestrator.restart_services(RestartKind::Core, None).await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.message.as_deref(), Some("Services (core) restarted."));
    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0.to_string(),
        "docker compose -f docker-compose.core.yml up -d --build"
    );
    assert_eq!(calls[0].1, ws.root());
}

/// `all` covers the foundational stack and leaves the admin stack alone.
#[tokio::test]
async fn test_restart_all_skips_admin() {
    let ws = Workspace::new();
    let executor = Arc::new(RecordingExecutor::new());
    let orchestrator = ws.orchestrator(executor.clone());

    orchestrator.restart_services(RestartKind::All, None).await;

    assert_eq!(
        executor.commands()[0].to_string(),
        "docker compose -f docker-compose.core.yml -f docker-compose.contest.yml \
         -f docker-compose.worker.yml up -d --build"
    );
}

#[tokio::test]
async fn test_custom_restart_keeps_only_valid_names() {
    let ws = Workspace::new();
    let executor = Arc::new(RecordingExecutor::new());
    let orchestrator = ws.orchestrator(executor.clone());

    let result = orchestrator
        .restart_services(
            RestartKind::Custom,
            Some(vec![
                "contest-web".to_string(),
                "web; rm -rf /".to_string(),
                "worker_1".to_string(),
            ]),
        )
        .await;

    assert!(result.success);
    assert_eq!(
        result.message.as_deref(),
        Some("Services (custom: contest-web, worker_1) restarted.")
    );
    let cmd = &executor.commands()[0];
    assert_eq!(cmd.positional(), &["contest-web".to_string(), "worker_1".to_string()]);
    assert!(cmd.args.iter().all(|a| !a.contains(';')));
}

/// Nothing is spawned when no requested name survives sanitization.
#[tokio::test]
async fn test_custom_restart_without_valid_names_is_rejected() {
    let ws = Workspace::new();
    let executor = Arc::new(RecordingExecutor::new());
    let orchestrator = ws.orchestrator(executor.clone());

    for services in [Some(vec!["; drop".to_string()]), Some(vec![]), None] {
        let result = orchestrator
            .restart_services(RestartKind::Custom, services)
            .await;
        assert!(!result.success);
        assert!(result.error.is_some());
    }
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_failed_restart_reports_error() {
    let ws = Workspace::new();
    let executor = Arc::new(RecordingExecutor::new());
    executor.reply_failure("no such service: worker");
    let orchestrator = ws.orchestrator(executor);

    let result = orchestrator.restart_services(RestartKind::Worker, None).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("no such service: worker"));
    assert!(result.message.is_none());
}

#[tokio::test]
async fn test_switch_contest_through_orchestrator() {
    let ws = Workspace::new();
    let executor = Arc::new(RecordingExecutor::new());
    let orchestrator = ws.orchestrator(executor.clone());

    let result = orchestrator.switch_contest(12).await;

    assert!(result.success);
    assert!(ws.read(".env.contest").contains("\nCONTEST_ID=12\n"));
    assert_eq!(executor.calls().len(), 1);
}

#[tokio::test]
async fn test_compose_action_on_every_group() {
    let ws = Workspace::new();
    let executor = Arc::new(RecordingExecutor::new());
    executor.reply_ok("");
    let orchestrator = ws.orchestrator(executor.clone());

    let result = orchestrator
        .compose_action(ComposeAction::Build, None)
        .await;

    assert!(result.success);
    assert_eq!(result.message.as_deref(), Some("compose build (all) finished."));
    let cmd = &executor.commands()[0];
    assert_eq!(cmd.args.iter().filter(|a| *a == "-f").count(), 4);
    assert_eq!(&cmd.args[cmd.args.len() - 2..], &["build", "--no-cache"]);
}
