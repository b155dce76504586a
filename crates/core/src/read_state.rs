// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Watermarks and ghost cursors (§3, §4.5, §8 testable properties).

use serde::{Deserialize, Serialize};

use crate::message::MessageId;

/// Durable per-`(agent, home)` cursor. `home` of `"mentions"` is a virtual
/// home holding the agent's last-acknowledged mention cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    pub agent: String,
    pub home: String,
    pub message_guid: MessageId,
    pub message_ts: u64,
}

impl Watermark {
    /// Monotonicity check (§3, §8): the candidate must have
    /// `(ts_new, guid_new) >= (ts_old, guid_old)` lexicographically.
    pub fn allows_advance_to(&self, new_ts: u64, new_guid: &MessageId) -> bool {
        (new_ts, new_guid.as_str()) >= (self.message_ts, self.message_guid.as_str())
    }
}

/// One-shot unread boundary set by the outgoing agent for the incoming one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostCursor {
    pub agent: String,
    pub home: String,
    pub message_guid: MessageId,
    pub must_read: bool,
    pub set_at: u64,
    #[serde(default)]
    pub session_ack_at: Option<u64>,
}

impl GhostCursor {
    /// A ghost cursor is usable as this session's unread boundary only if it
    /// has not already been acknowledged this session (§4.5, §8 one-shotness).
    pub fn is_pending_this_session(&self) -> bool {
        self.session_ack_at.is_none()
    }

    /// Acknowledge the cursor for the current session — it stops being the
    /// boundary until a new session clears `session_ack_at` again.
    pub fn ack(&mut self, now_ms: u64) {
        self.session_ack_at = Some(now_ms);
    }

    /// New sessions clear `session_ack_at` so the cursor is "unread again".
    pub fn clear_for_new_session(&mut self) {
        self.session_ack_at = None;
    }
}

#[cfg(test)]
#[path = "read_state_tests.rs"]
mod tests;
