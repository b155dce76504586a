// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Message entity (§3 Message, §4.4 message engine).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    /// `msg-<ulid-26>` unique message identifier.
    pub struct MessageId;
}

/// Author or container kind for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgType {
    Agent,
    User,
    Event,
    Tombstone,
}

/// One agent's reaction timestamp, part of `reactions: map<reaction, list<...>>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub agent: String,
    pub ts: u64,
}

/// A message (§3 Message). `home` is either the literal string `"room"` or a
/// thread guid (stored as a plain `String` here since thread guids are
/// themselves strings and the room sentinel is not a valid thread guid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub ts: u64,
    pub from_agent: String,
    pub body: String,
    pub home: String,
    #[serde(default)]
    pub reply_to: Option<MessageId>,
    #[serde(default)]
    pub references: Vec<MessageId>,
    #[serde(default)]
    pub surface_message: Option<MessageId>,
    #[serde(default)]
    pub quote_message_guid: Option<MessageId>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub reactions: HashMap<String, Vec<Reaction>>,
    #[serde(default)]
    pub archived_at: Option<u64>,
    #[serde(default)]
    pub edited_at: Option<u64>,
    #[serde(default)]
    pub edit_count: u32,
    pub msg_type: MsgType,
}

/// Sentinel value for `home` meaning "the top-level room" rather than a thread.
pub const ROOM: &str = "room";

impl Message {
    pub fn is_in_room(&self) -> bool {
        self.home == ROOM
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn is_tombstone(&self) -> bool {
        self.msg_type == MsgType::Tombstone
    }

    /// (iv) tombstones are author "system", not repliable.
    pub fn is_repliable(&self) -> bool {
        !self.is_tombstone()
    }

    pub fn has_reactions(&self) -> bool {
        self.reactions.values().any(|v| !v.is_empty())
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
