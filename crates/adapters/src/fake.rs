// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Deterministic test double for [`Driver`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use agentbus_core::AgentId;

use crate::driver::{Driver, DriverError, DriverHandle, SpawnRequest};

#[derive(Debug, Clone)]
pub enum DriverCall {
    Spawn { agent_id: AgentId, command: String },
    Signal { agent_id: AgentId, message: String },
    Kill { agent_id: AgentId },
}

#[derive(Clone, Default)]
pub struct FakeDriver {
    inner: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    running: HashMap<AgentId, Vec<String>>,
    calls: Vec<DriverCall>,
    spawn_error: Option<String>,
    signal_error: Option<String>,
    next_pid: u32,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.inner.lock().calls.clone()
    }

    pub fn set_spawn_error(&self, message: impl Into<String>) {
        self.inner.lock().spawn_error = Some(message.into());
    }

    pub fn set_signal_error(&self, message: impl Into<String>) {
        self.inner.lock().signal_error = Some(message.into());
    }

    /// Messages delivered to `agent_id` via `spawn`'s prompt and subsequent
    /// `signal` calls, in order.
    pub fn messages_sent_to(&self, agent_id: &AgentId) -> Vec<String> {
        self.inner
            .lock()
            .running
            .get(agent_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn spawn(&self, request: SpawnRequest) -> Result<DriverHandle, DriverError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DriverCall::Spawn {
            agent_id: request.agent_id.clone(),
            command: request.command.clone(),
        });
        if let Some(message) = inner.spawn_error.take() {
            return Err(DriverError::SpawnFailed(message));
        }
        inner.next_pid += 1;
        let pid = inner.next_pid;
        inner
            .running
            .insert(request.agent_id.clone(), vec![request.prompt.clone()]);
        Ok(DriverHandle {
            agent_id: request.agent_id,
            pid,
        })
    }

    async fn signal(&self, agent_id: &AgentId, message: &str) -> Result<(), DriverError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DriverCall::Signal {
            agent_id: agent_id.clone(),
            message: message.to_string(),
        });
        if let Some(err) = inner.signal_error.take() {
            return Err(DriverError::SignalFailed(err));
        }
        inner
            .running
            .get_mut(agent_id)
            .ok_or_else(|| DriverError::NotFound(agent_id.to_string()))?
            .push(message.to_string());
        Ok(())
    }

    async fn is_running(&self, agent_id: &AgentId) -> bool {
        self.inner.lock().running.contains_key(agent_id)
    }

    async fn kill(&self, agent_id: &AgentId) -> Result<(), DriverError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DriverCall::Kill {
            agent_id: agent_id.clone(),
        });
        inner
            .running
            .remove(agent_id)
            .map(|_| ())
            .ok_or_else(|| DriverError::NotFound(agent_id.to_string()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
