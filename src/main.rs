// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use coresync::backends::{BackendFactory, GitUpdateSource, HttpDemandSource};
use coresync::config::consts::DEFAULT_CONFIG_FILE;
use coresync::config::{discover_projects, load_runtime_config, RuntimeConfig};
use coresync::engine::{OrchestratorFactory, RunOutcome, Supervisor, UpdateWatchdog};
use coresync::observability::metrics::FailureCounters;
use coresync::traits::DemandSource;

/// Keeps every project's pool of protected artifacts topped up and mirrored.
#[derive(Parser, Debug)]
#[command(name = "coresync", version, about)]
struct Args {
    /// Runtime configuration file (YAML); missing means all defaults
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the folder holding one sub-folder per project
    #[arg(long)]
    setup_dir: Option<PathBuf>,

    /// Do not poll for updates of the deployed copy
    #[arg(long)]
    no_watchdog: bool,

    /// Emit JSON log lines
    #[arg(
        long,
        env = "CORESYNC_LOG_JSON",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // JSON logs for log shippers, human-readable otherwise
    let filter = EnvFilter::from_default_env().add_directive("coresync=info".parse()?);
    if args.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let mut config = load_runtime_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(dir) = args.setup_dir {
        config.setup_dir = dir;
    }
    if args.no_watchdog {
        config.watchdog.enabled = false;
    }

    let token = CancellationToken::new();
    let supervisor = build_supervisor(&config, token.clone())?;

    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            signal_token.cancel();
        }
    });

    match supervisor.run().await {
        RunOutcome::Shutdown => {
            tracing::info!("Stopped");
            Ok(())
        }
        RunOutcome::Restart => restart_process(),
    }
}

fn build_supervisor(config: &RuntimeConfig, token: CancellationToken) -> Result<Supervisor> {
    let demand: Arc<dyn DemandSource> = Arc::new(
        HttpDemandSource::new(config.demand.timeout()).context("building demand HTTP client")?,
    );
    let factory = Arc::new(OrchestratorFactory::new(
        config,
        BackendFactory::protector(&config.protect),
        BackendFactory::mirror(&config.mirror),
        demand,
    ));

    let mut supervisor = Supervisor::new(
        token,
        config.supervisor.restart_delay(),
        config.watchdog.restart_grace(),
    );

    for project in discover_projects(&config.setup_dir) {
        let counters = Arc::new(FailureCounters::new());
        if let Err(e) = factory.build(&project, Arc::clone(&counters)) {
            tracing::error!(project = %project.name, error = %e, "Skipping project");
            continue;
        }

        let factory = Arc::clone(&factory);
        let name = project.name.clone();
        supervisor.add_task(name, move |token: CancellationToken| {
            let built = factory.build(&project, Arc::clone(&counters));
            async move {
                match built {
                    Ok(orchestrator) => orchestrator.run(token).await,
                    Err(e) => tracing::error!(error = %e, "Could not rebuild orchestrator"),
                }
            }
        });
    }

    if config.watchdog.enabled {
        let source = Arc::new(GitUpdateSource::new(config.watchdog.repo_dir.clone()));
        supervisor = supervisor.with_watchdog(UpdateWatchdog::new(source, &config.watchdog));
    }

    Ok(supervisor)
}

/// Replace this process with a fresh instance of the same executable and arguments.
fn restart_process() -> Result<()> {
    let exe = std::env::current_exe().context("locating current executable")?;
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    tracing::info!(exe = %exe.display(), "Restarting after update");
    reexec(&exe, &args)
}

#[cfg(unix)]
fn reexec(exe: &Path, args: &[OsString]) -> Result<()> {
    use std::os::unix::process::CommandExt;

    // exec only returns on failure
    let err = std::process::Command::new(exe).args(args).exec();
    Err(anyhow::Error::new(err).context(format!("re-executing {}", exe.display())))
}

#[cfg(not(unix))]
fn reexec(exe: &Path, args: &[OsString]) -> Result<()> {
    std::process::Command::new(exe)
        .args(args)
        .spawn()
        .with_context(|| format!("spawning {}", exe.display()))?;
    std::process::exit(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_json_accepts_flag_and_numeric_env_values() {
        let args = Args::try_parse_from(["coresync", "--log-json"]).unwrap();
        assert!(args.log_json);

        // one test owns the variable so parallel tests never observe it
        std::env::set_var("CORESYNC_LOG_JSON", "1");
        let on = Args::try_parse_from(["coresync"]);
        std::env::set_var("CORESYNC_LOG_JSON", "0");
        let off = Args::try_parse_from(["coresync"]);
        std::env::remove_var("CORESYNC_LOG_JSON");

        assert!(on.unwrap().log_json);
        assert!(!off.unwrap().log_json);
    }

    #[test]
    fn defaults_to_local_config_file() {
        let args = Args::try_parse_from(["coresync", "--no-watchdog"]).unwrap();
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(args.no_watchdog);
        assert!(args.setup_dir.is_none());
    }
}
