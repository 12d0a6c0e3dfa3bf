// Integration tests for reading and updating configuration documents.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::support::{RecordingExecutor, Workspace, CONTEST_ENV};

fn updates(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_read_env_returns_content_and_pairs() {
    let ws = Workspace::new();
    let orchestrator = ws.orchestrator(Arc::new(RecordingExecutor::new()));

    let snapshot = orchestrator.read_env(".env.contest").await;

    assert!(snapshot.success);
    assert_eq!(snapshot.content.as_deref(), Some(CONTEST_ENV));
    let config = snapshot.config.unwrap();
    assert_eq!(config.get("CONTEST_ID").map(String::as_str), Some("1"));
    assert_eq!(config.get("DB_HOST").map(String::as_str), Some("cms-database"));
    assert!(!config.keys().any(|k| k.starts_with('#')));
}

#[tokio::test]
async fn test_read_env_missing_file() {
    let ws = Workspace::new();
    let orchestrator = ws.orchestrator(Arc::new(RecordingExecutor::new()));

    let snapshot = orchestrator.read_env(".env.core").await;

    assert!(!snapshot.success);
    assert!(snapshot.content.is_none());
    assert!(snapshot.error.unwrap().contains(".env.core"));
}

#[tokio::test]
async fn test_file_names_with_separators_are_refused() {
    let ws = Workspace::new();
    ws.write("config/.env", "SECRET=1\n");
    let orchestrator = ws.orchestrator(Arc::new(RecordingExecutor::new()));

    for file in ["config/.env", "../.env.contest", ".."] {
        let snapshot = orchestrator.read_env(file).await;
        assert!(!snapshot.success, "{:?} was read", file);

        let result = orchestrator
            .update_env(file, &updates(&[("SECRET", "2")]))
            .await;
        assert!(!result.success, "{:?} was written", file);
    }
    assert_eq!(ws.read("config/.env"), "SECRET=1\n");
}

/// Existing keys change in place, new keys are appended, comments survive.
#[tokio::test]
async fn test_update_env_applies_all_updates() {
    let ws = Workspace::new();
    let executor = Arc::new(RecordingExecutor::new());
    let orchestrator = ws.orchestrator(executor.clone());

    let result = orchestrator
        .update_env(
            ".env.contest",
            &updates(&[("DB_HOST", "db.internal"), ("WORKER_COUNT", "4")]),
        )
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        ws.read(".env.contest"),
        "# contest stack\nDB_HOST=db.internal\nCONTEST_ID=1\nCONTESTS_DEPLOY_CONFIG=single\nWORKER_COUNT=4\n"
    );
    // Saving never restarts anything by itself.
    assert!(executor.calls().is_empty());
}

/// One bad pair rejects the whole update before anything is written.
#[tokio::test]
async fn test_update_env_rejects_invalid_pairs() {
    let ws = Workspace::new();
    let orchestrator = ws.orchestrator(Arc::new(RecordingExecutor::new()));

    let bad_key = orchestrator
        .update_env(".env.contest", &updates(&[("DB_HOST", "x"), ("1BAD", "y")]))
        .await;
    assert!(!bad_key.success);
    assert!(bad_key.error.unwrap().contains("1BAD"));

    let multiline = orchestrator
        .update_env(".env.contest", &updates(&[("DB_HOST", "x\nCONTEST_ID=99")]))
        .await;
    assert!(!multiline.success);

    assert_eq!(ws.read(".env.contest"), CONTEST_ENV);
}
