// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! The real `Driver`: spawns agent turns as OS subprocesses.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};

use agentbus_core::AgentId;

use crate::driver::{Driver, DriverError, DriverHandle, SpawnRequest};

#[derive(Clone, Default)]
pub struct ProcessDriver {
    children: Arc<Mutex<HashMap<AgentId, Child>>>,
}

impl ProcessDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Driver for ProcessDriver {
    async fn spawn(&self, request: SpawnRequest) -> Result<DriverHandle, DriverError> {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&request.log_path)
            .map_err(|e| DriverError::SpawnFailed(e.to_string()))?;
        let log_file_err = log_file
            .try_clone()
            .map_err(|e| DriverError::SpawnFailed(e.to_string()))?;

        let mut parts = request.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| DriverError::SpawnFailed("empty command".to_string()))?;

        let mut command = Command::new(program);
        command
            .args(parts)
            .current_dir(&request.cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(log_file_err));
        for (key, value) in &request.env {
            command.env(key, value);
        }

        let mut child = command
            .spawn()
            .map_err(|e| DriverError::SpawnFailed(e.to_string()))?;

        let pid = child.id().unwrap_or(0);

        if let Some(mut stdin) = child.stdin.take() {
            let prompt = request.prompt.clone();
            let _ = stdin.write_all(prompt.as_bytes()).await;
            let _ = stdin.write_all(b"\n").await;
            child.stdin = Some(stdin);
        }

        self.children.lock().insert(request.agent_id.clone(), child);

        Ok(DriverHandle {
            agent_id: request.agent_id,
            pid,
        })
    }

    async fn signal(&self, agent_id: &AgentId, message: &str) -> Result<(), DriverError> {
        let stdin = {
            let mut children = self.children.lock();
            let child = children
                .get_mut(agent_id)
                .ok_or_else(|| DriverError::NotFound(agent_id.to_string()))?;
            child.stdin.take()
        };
        let Some(mut stdin) = stdin else {
            return Err(DriverError::SignalFailed(format!(
                "{agent_id} has no open stdin"
            )));
        };
        let result = async {
            stdin.write_all(message.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            Ok::<_, std::io::Error>(())
        }
        .await;
        if let Some(child) = self.children.lock().get_mut(agent_id) {
            child.stdin = Some(stdin);
        }
        result.map_err(|e| DriverError::SignalFailed(e.to_string()))
    }

    async fn is_running(&self, agent_id: &AgentId) -> bool {
        let mut children = self.children.lock();
        match children.get_mut(agent_id) {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn kill(&self, agent_id: &AgentId) -> Result<(), DriverError> {
        let child = self.children.lock().remove(agent_id);
        match child {
            Some(mut child) => child
                .kill()
                .await
                .map_err(|e| DriverError::SignalFailed(e.to_string())),
            None => Err(DriverError::NotFound(agent_id.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
