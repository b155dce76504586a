// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! The `Driver` trait: the daemon's one seam onto "run an agent's turn".

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use agentbus_core::AgentId;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("agent not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("signal failed: {0}")]
    SignalFailed(String),
}

/// Everything the driver needs to start an agent's turn.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub agent_id: AgentId,
    /// Command line to execute, e.g. `"claude --dangerously-skip-permissions"`.
    pub command: String,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
    /// Initial text delivered to the agent once it starts (the mention or
    /// wake payload that woke it).
    pub prompt: String,
    /// File the agent's stdout/stderr are appended to for operator review.
    pub log_path: PathBuf,
}

/// A handle to a spawned agent process.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    pub agent_id: AgentId,
    pub pid: u32,
}

/// Spawns and signals the external process backing an agent's turn.
///
/// Implementations are `Clone + Send + Sync` so the daemon can hold one
/// shared instance across its poll loop's concurrent tasks (§4.8, §5).
#[async_trait]
pub trait Driver: Clone + Send + Sync + 'static {
    /// Start a new process for `request`. Returns once the process has been
    /// launched, not once it has produced output.
    async fn spawn(&self, request: SpawnRequest) -> Result<DriverHandle, DriverError>;

    /// Deliver an interrupt message to an already-running agent (§4.8
    /// interrupt grammar) by writing to its stdin.
    async fn signal(&self, agent_id: &AgentId, message: &str) -> Result<(), DriverError>;

    /// Whether the process for `agent_id` is still alive.
    async fn is_running(&self, agent_id: &AgentId) -> bool;

    /// Forcefully terminate the process, e.g. on `reset` (§4.8).
    async fn kill(&self, agent_id: &AgentId) -> Result<(), DriverError>;
}
