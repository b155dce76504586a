// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Agent identity and presence (§3 Agent, §4.8 presence state machine).

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::CoreError;

crate::define_id! {
    /// Stable opaque identifier for an agent, assigned once at registration
    /// and never reused, independent of the human-chosen `agent_id`.
    pub struct AgentGuid;
}

crate::define_id! {
    /// Human-chosen agent identifier, e.g. `alice`, `alice.2`.
    ///
    /// Must match `^[a-z][a-z0-9]*(-[a-z0-9]+)*$` for the base (the part
    /// before an optional `.N` clone suffix).
    pub struct AgentId;
}

fn agent_base_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("static regex is valid")
    })
}

impl AgentId {
    /// Splits `alice.2` into (`alice`, Some(2)); `alice` into (`alice`, None).
    pub fn split_clone_suffix(&self) -> (&str, Option<u32>) {
        match self.as_str().rsplit_once('.') {
            Some((base, suffix)) if suffix.chars().all(|c| c.is_ascii_digit()) && !suffix.is_empty() => {
                match suffix.parse() {
                    Ok(n) => (base, Some(n)),
                    Err(_) => (self.as_str(), None),
                }
            }
            _ => (self.as_str(), None),
        }
    }

    /// The canonical agent-id without a `.N` version suffix (§GLOSSARY "Agent base").
    pub fn base(&self) -> &str {
        self.split_clone_suffix().0
    }

    /// Validates the base against `^[a-z][a-z0-9]*(-[a-z0-9]+)*$`.
    pub fn validate(&self) -> Result<(), CoreError> {
        let base = self.base();
        if agent_base_regex().is_match(base) {
            Ok(())
        } else {
            Err(CoreError::InvalidAgentId(self.as_str().to_string()))
        }
    }
}

/// Presence state machine (§4.8).
///
/// ```text
/// offline → spawning → active → idle → offline
///                    ↘ error ↙
/// active --bye--> offline (clears status, preserves session_id for audit)
/// active --brb--> brb ---(timer exits)--> offline
/// any    --reset--> offline
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Offline,
    Spawning,
    Active,
    Idle,
    Brb,
    Error,
}

impl Presence {
    /// Whether `to` is a legal transition from `self` under the state machine
    /// in §4.8 (ignoring the always-legal `reset` transition, handled by the
    /// caller since it applies from any state).
    pub fn can_transition_to(self, to: Presence) -> bool {
        use Presence::*;
        matches!(
            (self, to),
            (Offline, Spawning)
                | (Spawning, Active)
                | (Spawning, Error)
                | (Active, Idle)
                | (Active, Error)
                | (Active, Offline) // bye
                | (Active, Brb)
                | (Idle, Offline)
                | (Idle, Spawning) // re-mention while idle
                | (Brb, Offline)
                | (Brb, Active) // brb, still working
                | (Error, Spawning)
        )
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Presence::Offline => "offline",
            Presence::Spawning => "spawning",
            Presence::Active => "active",
            Presence::Idle => "idle",
            Presence::Brb => "brb",
            Presence::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// An agent participating in the bus (§3 Agent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub guid: AgentGuid,
    pub agent_id: AgentId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub registered_at: u64,
    pub last_seen: u64,
    #[serde(default)]
    pub left_at: Option<u64>,
    #[serde(default)]
    pub last_heartbeat: Option<u64>,
    pub managed: bool,
    pub presence: Presence,
    #[serde(default)]
    pub last_session_id: Option<String>,
}

impl Agent {
    pub fn is_active_clone_of(&self, base: &str) -> bool {
        self.agent_id.base() == base
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
