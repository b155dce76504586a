// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Trigger and presence-change notifications (§3, §5): events the daemon
//! emits to the log for visibility, not ones agents author directly.

use serde::{Deserialize, Serialize};

use crate::agent::Presence;

/// A record of a presence state transition, emitted alongside the agent's
/// own `presence` field update so readers can reconstruct history without
/// re-deriving it from heartbeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub agent: String,
    pub from: Presence,
    pub to: Presence,
    pub at: u64,
    #[serde(default)]
    pub reason: Option<String>,
}

/// What provoked the daemon to (re)spawn or signal an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Mention,
    Wake,
    Interrupt,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub agent: String,
    pub kind: TriggerKind,
    pub at: u64,
    #[serde(default)]
    pub source_message_guid: Option<String>,
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
