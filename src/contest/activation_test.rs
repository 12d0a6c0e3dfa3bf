#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::compose::CommandBuilder;
    use crate::contest::{set_contest_id, ContestActivator, SWITCHED_MESSAGE};
    use crate::locate::{Fixed, Locator};
    use crate::support::{RecordingExecutor, Workspace, CONTEST_ENV};

    fn activator(ws: &Workspace, executor: Arc<RecordingExecutor>) -> ContestActivator {
        let locator = Locator::new(
            vec![Box::new(Fixed(ws.root().to_path_buf()))],
            ws.root().to_path_buf(),
        );
        ContestActivator::new(
            Arc::new(locator),
            Arc::new(CommandBuilder::new(&ws.cfg)),
            executor,
            ws.root().to_path_buf(),
            ".env.contest",
        )
    }

    /// Existing id is replaced in place, nothing else moves.
    #[tokio::test]
    async fn test_replaces_existing_contest_id() {
        let ws = Workspace::new();
        let executor = Arc::new(RecordingExecutor::new());

        let result = activator(&ws, executor.clone()).activate(42).await;

        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.message.as_deref(), Some(SWITCHED_MESSAGE));
        assert_eq!(
            ws.read(".env.contest"),
            CONTEST_ENV.replace("CONTEST_ID=1\n", "CONTEST_ID=42\n")
        );
    }

    /// Missing key: exactly one line appended, the rest byte-for-byte intact.
    #[tokio::test]
    async fn test_appends_contest_id_when_absent() {
        let ws = Workspace::new();
        let original = "DB_HOST=cms-database\nADMIN_LISTEN_PORT=8889\n";
        ws.write(".env.contest", original);
        let executor = Arc::new(RecordingExecutor::new());

        let result = activator(&ws, executor).activate(7).await;

        assert!(result.success);
        let written = ws.read(".env.contest");
        assert_eq!(written, format!("{}CONTEST_ID=7\n", original));
        assert_eq!(written.matches("CONTEST_ID=").count(), 1);
    }

    /// The contest group is rebuilt from the deployment root.
    #[tokio::test]
    async fn test_rebuilds_contest_group() {
        let ws = Workspace::new();
        let executor = Arc::new(RecordingExecutor::new());

        activator(&ws, executor.clone()).activate(3).await;

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        let (cmd, cwd) = &calls[0];
        assert_eq!(
            cmd.to_string(),
            "docker compose -f docker-compose.contest.yml up -d --build"
        );
        assert_eq!(cwd, ws.root());
    }

    /// A failed rebuild is surfaced but the configuration change stays.
    #[tokio::test]
    async fn test_failed_rebuild_keeps_configuration() {
        let ws = Workspace::new();
        let executor = Arc::new(RecordingExecutor::new());
        executor.reply_failure("Cannot connect to the Docker daemon");

        let result = activator(&ws, executor).activate(9).await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Cannot connect to the Docker daemon")
        );
        assert!(ws.read(".env.contest").contains("CONTEST_ID=9\n"));
    }

    /// Nothing is written and nothing runs when the file cannot be found.
    #[tokio::test]
    async fn test_missing_file_fails_without_side_effects() {
        let ws = Workspace::empty();
        let executor = Arc::new(RecordingExecutor::new());

        let result = activator(&ws, executor.clone()).activate(5).await;

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains(".env.contest"), "{}", error);
        assert!(error.contains(&ws.root().display().to_string()), "{}", error);
        assert!(executor.calls().is_empty());
        assert!(!ws.path(".env.contest").exists());
    }

    #[tokio::test]
    async fn test_stdout_is_forwarded() {
        let ws = Workspace::new();
        let executor = Arc::new(RecordingExecutor::new());
        executor.reply_ok("Container cms-contest-web Started\n");

        let result = activator(&ws, executor).activate(2).await;

        assert_eq!(
            result.output.as_deref(),
            Some("Container cms-contest-web Started\n")
        );
    }

    /// Only `CONTEST_ID=<digits>` counts as the existing entry.
    #[tokio::test]
    async fn test_non_numeric_contest_id_line_is_left_alone() {
        let ws = Workspace::new();
        ws.write(".env.contest", "A=1\nCONTEST_ID=abc\nB=2\n");

        let result = activator(&ws, Arc::new(RecordingExecutor::new()))
            .activate(7)
            .await;

        assert!(result.success);
        assert_eq!(
            ws.read(".env.contest"),
            "A=1\nCONTEST_ID=abc\nB=2\nCONTEST_ID=7\n"
        );
    }

    #[tokio::test]
    async fn test_empty_contest_id_line_is_left_alone() {
        let ws = Workspace::new();
        ws.write(".env.contest", "CONTEST_ID=\nB=2");

        activator(&ws, Arc::new(RecordingExecutor::new()))
            .activate(4)
            .await;

        assert_eq!(ws.read(".env.contest"), "CONTEST_ID=\nB=2\nCONTEST_ID=4\n");
    }

    #[test]
    fn test_set_contest_id_replaces_digits_only() {
        assert_eq!(set_contest_id("CONTEST_ID=12abc\n", 7), "CONTEST_ID=7abc\n");
        assert_eq!(
            set_contest_id("X=1\nCONTEST_ID=3\nCONTEST_ID=5\n", 9),
            "X=1\nCONTEST_ID=9\nCONTEST_ID=5\n"
        );
        assert_eq!(set_contest_id("MY_CONTEST_ID=3\n", 1), "MY_CONTEST_ID=3\nCONTEST_ID=1\n");
    }
}
