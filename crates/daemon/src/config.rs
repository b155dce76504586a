// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Daemon configuration: paths are all rooted under `<project>/.agentbus`,
//! one daemon per project directory (unlike a user-level daemon, each
//! project gets its own lock, log stream directory, and projection).

use std::path::PathBuf;

use crate::error::DaemonError;

/// Default idle-to-offline timeout, in seconds.
const DEFAULT_STALE_AFTER_SECS: u64 = 15 * 60;

/// Default cooldown after an interrupted agent exits cleanly, in seconds.
const DEFAULT_COOLDOWN_SECS: u64 = 30;

/// Default poll loop resolution, in milliseconds.
const DEFAULT_POLL_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    /// The project directory this daemon serves.
    pub project_root: PathBuf,
    /// `.agentbus` directory under `project_root`.
    pub state_dir: PathBuf,
    /// Directory holding per-stream event log files.
    pub log_dir: PathBuf,
    /// Path to the SQLite read projection.
    pub projection_path: PathBuf,
    /// Path to the daemon's lock/PID file.
    pub lock_path: PathBuf,
    /// Path to the daemon's own log file.
    pub log_path: PathBuf,
    /// Seconds of inactivity before an agent is considered stale.
    pub stale_after_secs: u64,
    /// Cooldown after a clean interrupted-agent exit before re-spawning.
    pub cooldown_secs: u64,
    /// Poll loop tick resolution.
    pub poll_interval_ms: u64,
    /// Command line used to spawn a managed agent's driver process, e.g.
    /// `"claude --dangerously-skip-permissions"`.
    pub driver_command: String,
}

impl Config {
    /// Load configuration for the project at `AGENTBUS_PROJECT_ROOT`, or the
    /// current working directory if unset.
    pub fn load() -> Result<Self, DaemonError> {
        let project_root = project_root()?;
        let state_dir = project_root.join(".agentbus");

        Ok(Self {
            log_dir: state_dir.join("log"),
            projection_path: state_dir.join("projection.db"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            stale_after_secs: env_u64("AGENTBUS_STALE_AFTER_SECS").unwrap_or(DEFAULT_STALE_AFTER_SECS),
            cooldown_secs: env_u64("AGENTBUS_COOLDOWN_SECS").unwrap_or(DEFAULT_COOLDOWN_SECS),
            poll_interval_ms: env_u64("AGENTBUS_POLL_MS").unwrap_or(DEFAULT_POLL_MS),
            driver_command: std::env::var("AGENTBUS_DRIVER_COMMAND")
                .unwrap_or_else(|_| "claude".to_string()),
            state_dir,
            project_root,
        })
    }
}

impl Config {
    /// Build a config directly from a project root, bypassing environment
    /// lookup entirely. Used by tests that need isolation without racing on
    /// process-global env vars.
    #[cfg(any(test, feature = "test-support"))]
    pub fn load_for_root(project_root: PathBuf) -> Self {
        let state_dir = project_root.join(".agentbus");
        Self {
            log_dir: state_dir.join("log"),
            projection_path: state_dir.join("projection.db"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            poll_interval_ms: DEFAULT_POLL_MS,
            driver_command: "true".to_string(),
            state_dir,
            project_root,
        }
    }
}

fn project_root() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var("AGENTBUS_PROJECT_ROOT") {
        return Ok(PathBuf::from(dir));
    }
    std::env::current_dir().map_err(|_| DaemonError::NoProjectRoot)
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
