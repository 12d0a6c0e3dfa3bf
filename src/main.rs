// Main entrypoint for the contestops orchestration service.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use contestops::app::App;
use contestops::compose::{ComposeAction, ContainerAction, StackKind};
use contestops::config::{Config, ConfigTrait};
use contestops::orchestrator::{Orchestrator, RestartKind};
use contestops::shutdown::GracefulShutdown;

const CONFIG_PATH: &str = "cfg/contestops.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/contestops.cfg.local.yaml";
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(60);

/// contestops - configuration impact analysis and restart orchestration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs the HTTP API (default)
    Serve,
    /// Prints the services a change of the given keys invalidates
    Analyze {
        #[arg(value_name = "KEY")]
        keys: Vec<String>,
    },
    /// Restarts a service group or an explicit list of services
    Restart {
        /// all, core, admin, contest, worker or custom
        kind: RestartKind,
        /// Services for a custom restart, comma separated
        #[arg(long, value_delimiter = ',')]
        services: Option<Vec<String>>,
    },
    /// Sets the active contest and rebuilds the contest services
    SwitchContest {
        #[arg(value_name = "ID")]
        id: u64,
    },
    /// Runs up, down, restart or build on one group, or on every group
    Compose {
        action: ComposeAction,
        #[arg(long)]
        group: Option<StackKind>,
    },
    /// Lists every container, running or not
    Containers,
    /// Starts, stops or restarts one container
    Container {
        action: ContainerAction,
        #[arg(value_name = "NAME")]
        id: String,
    },
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then falls back to default config.
fn load_cfg(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    if let Some(custom_path) = path {
        let cfg = Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path))?;
        return Ok((cfg, custom_path));
    }

    match Config::load(CONFIG_PATH_LOCAL) {
        Ok(cfg) => Ok((cfg, PathBuf::from(CONFIG_PATH_LOCAL))),
        Err(_) => {
            let cfg = Config::load(CONFIG_PATH)
                .with_context(|| format!("failed to load config from {}", CONFIG_PATH))?;
            Ok((cfg, PathBuf::from(CONFIG_PATH)))
        }
    }
}

/// Configures structured logging on stderr; stdout stays reserved for
/// one-shot command results.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_deref())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let (cfg, cfg_path) = load_cfg(args.cfg)?;
    configure_logger(&cfg);
    info!(
        component = "config",
        event = "load_success",
        path = %cfg_path.display(),
        "config loaded"
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if let Err(e) = contestops::metrics::init_prometheus_exporter() {
                warn!(
                    component = "main",
                    event = "metrics_init_failed",
                    error = %e,
                    "metrics endpoint will not be available"
                );
            }
            runtime.block_on(serve(cfg))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Analyze { keys } => {
            let orchestrator = Orchestrator::from_config(&cfg);
            let analysis = runtime.block_on(orchestrator.analyze_restart_requirements(&keys));
            print_json(&analysis)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Restart { kind, services } => {
            let orchestrator = Orchestrator::from_config(&cfg);
            let result = runtime.block_on(orchestrator.restart_services(kind, services));
            print_json(&result)?;
            Ok(exit_code(result.success))
        }
        Command::SwitchContest { id } => {
            let orchestrator = Orchestrator::from_config(&cfg);
            let result = runtime.block_on(orchestrator.switch_contest(id));
            print_json(&result)?;
            Ok(exit_code(result.success))
        }
        Command::Compose { action, group } => {
            let orchestrator = Orchestrator::from_config(&cfg);
            let result = runtime.block_on(orchestrator.compose_action(action, group));
            print_json(&result)?;
            Ok(exit_code(result.success))
        }
        Command::Containers => {
            let orchestrator = Orchestrator::from_config(&cfg);
            let list = runtime.block_on(orchestrator.list_containers());
            print_json(&list)?;
            Ok(exit_code(list.success))
        }
        Command::Container { action, id } => {
            let orchestrator = Orchestrator::from_config(&cfg);
            let result = runtime.block_on(orchestrator.control_container(action, &id));
            print_json(&result)?;
            Ok(exit_code(result.success))
        }
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let shutdown_token = CancellationToken::new();
    let graceful_shutdown =
        Arc::new(GracefulShutdown::new(shutdown_token.clone()).with_timeout(GRACEFUL_TIMEOUT));

    let app = App::new(shutdown_token.clone(), cfg)?;
    app.serve(graceful_shutdown.clone()).await?;

    if let Err(e) = graceful_shutdown.await_shutdown().await {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode result")?;
    println!("{}", json);
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
