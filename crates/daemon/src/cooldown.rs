// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Post-exit respawn cooldown: after a clean exit (status 0), suppress
//! respawn for `cooldown_secs` unless the new wake is an interrupt or
//! `brb`-initiated — both of which bypass cooldown entirely.

use std::collections::HashMap;

use agentbus_core::AgentId;

#[derive(Debug, Default)]
pub struct Cooldowns {
    /// agent -> instant (seconds, via the shared clock) the cooldown expires.
    until: HashMap<AgentId, u64>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a clean exit for `agent`, starting a cooldown window.
    pub fn start(&mut self, agent: AgentId, now: u64, cooldown_secs: u64) {
        self.until.insert(agent, now + cooldown_secs);
    }

    /// Clear any cooldown for `agent` (e.g. on an interrupt, which bypasses
    /// cooldown regardless of how recently it exited).
    pub fn clear(&mut self, agent: &AgentId) {
        self.until.remove(agent);
    }

    /// Whether `agent` is currently suppressed from respawning.
    pub fn is_active(&self, agent: &AgentId, now: u64) -> bool {
        self.until.get(agent).is_some_and(|&exp| now < exp)
    }
}

#[cfg(test)]
#[path = "cooldown_tests.rs"]
mod tests;
