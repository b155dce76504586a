// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Subscription / mute / pin pairs (§3).

use serde::{Deserialize, Serialize};

use crate::message::MessageId;
use crate::thread::ThreadGuid;

/// (thread, agent) subscribed for notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub thread: ThreadGuid,
    pub agent: String,
}

/// (thread, agent) muted, optionally with an expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mute {
    pub thread: ThreadGuid,
    pub agent: String,
    #[serde(default)]
    pub expires_at: Option<u64>,
}

impl Mute {
    pub fn is_active(&self, now: u64) -> bool {
        match self.expires_at {
            Some(exp) => now < exp,
            None => true,
        }
    }
}

/// A pin — either a global thread-pin or a (message, thread) message-pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pin {
    Thread { thread: ThreadGuid },
    Message { message: MessageId, thread: ThreadGuid },
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
