// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! agentbusd: the background process that owns a project's poll loop and
//! dispatches managed-agent spawns.
//!
//! Unlike a socket-serving daemon, agentbusd is one writer among several —
//! the CLI and other tooling append directly to the event log. agentbusd's
//! own job is narrower: watch for mentions/wakes and drive agent presence.

use std::sync::Arc;
use std::time::Duration;

use agentbus_adapters::ProcessDriver;
use agentbus_core::SystemClock;
use agentbus_daemon::{logging, Config, DaemonLock, PollLoop};
use agentbus_storage::{EventLog, Projection, StorageError};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

/// Agent Bus orchestration daemon.
///
/// One daemon runs per project directory, polling the event log for
/// mentions and wake conditions and driving managed agents' presence.
#[derive(Debug, Parser)]
#[command(name = "agentbusd", version)]
struct Args {
    /// Take over the lock from a stale daemon, signaling it first.
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = Config::load()?;

    logging::rotate_log_if_needed(&config.log_path);
    let log_guard = logging::setup_logging(&config.log_path)?;

    info!("starting agentbusd for {}", config.project_root.display());

    let acquire = if args.force {
        DaemonLock::force_acquire(&config.lock_path)
    } else {
        DaemonLock::acquire(&config.lock_path)
    };
    let lock = match acquire {
        Ok(lock) => lock,
        Err(e) => {
            let holder = DaemonLock::read_holder_pid(&config.lock_path);
            eprintln!("agentbusd is already running");
            if let Some(pid) = holder {
                eprintln!("  pid: {pid}");
            }
            eprintln!("  retry with --force to take over");
            error!("failed to acquire lock: {}", e);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    let event_log = EventLog::open(config.log_dir.clone())?;
    let projection = open_or_rebuild_projection(&config, &event_log)?;
    let driver = ProcessDriver::new();
    let mut poll = PollLoop::new(config.clone(), event_log, projection, Arc::new(SystemClock), driver);

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut tick = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));

    println!("READY");
    info!("agentbusd ready, polling every {}ms", config.poll_interval_ms);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = poll.tick().await {
                    error!("poll tick failed: {}", e);
                }
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    drop(lock);
    info!("agentbusd stopped");
    Ok(())
}

/// Open the projection, rebuilding it from the log on schema drift or if it
/// doesn't exist yet.
fn open_or_rebuild_projection(
    config: &Config,
    log: &EventLog,
) -> Result<Projection, agentbus_daemon::DaemonError> {
    match Projection::open(&config.projection_path) {
        Ok(projection) => Ok(projection),
        Err(StorageError::SchemaDrift { found, expected }) => {
            warn!(found, expected, "projection schema drift, rebuilding");
            let events = log.read_all_sorted()?;
            Ok(Projection::rebuild_from_log(&config.projection_path, &events)?)
        }
        Err(e) => Err(e.into()),
    }
}
