// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Wake conditions (§3 WakeCondition, §4.7 wake-condition engine): a
//! registered pattern or timer that, once satisfied, asks the daemon to
//! nudge an agent.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// `wake-<ulid-26>` unique wake-condition identifier.
    pub struct WakeId;
}

/// What has to happen for the condition to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeType {
    /// Fire when a message matching `pattern` lands in `home`.
    Pattern,
    /// Fire once `fire_at` (epoch seconds) has passed.
    Timer,
    /// Fire on the next message in `home` regardless of content.
    NextMessage,
}

/// Whether the condition disarms itself after firing once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakePersistence {
    OneShot,
    Recurring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeCondition {
    pub id: WakeId,
    pub agent: String,
    pub wake_type: WakeType,
    pub persistence: WakePersistence,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub fire_at: Option<u64>,
    /// Restricts `NextMessage`/`Pattern` matching to messages authored by one
    /// of these agents (`on_mention(agents, in_thread?)`). Empty means any
    /// author matches.
    #[serde(default)]
    pub on_agents: Vec<String>,
    pub created_at: u64,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub last_fired_at: Option<u64>,
}

impl WakeCondition {
    pub fn is_armed(&self) -> bool {
        !self.paused
    }

    /// One-shot conditions that have already fired are done, not merely
    /// paused — callers should drop them rather than re-check them.
    pub fn is_spent(&self) -> bool {
        self.persistence == WakePersistence::OneShot && self.last_fired_at.is_some()
    }

    pub fn mark_fired(&mut self, now: u64) {
        self.last_fired_at = Some(now);
        if self.persistence == WakePersistence::OneShot {
            self.paused = true;
        }
    }
}

#[cfg(test)]
#[path = "wake_tests.rs"]
mod tests;
