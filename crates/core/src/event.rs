// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! The append-only event log's record types.
//!
//! Serializes with `{"type": "domain:verb", ...fields}`. This is the only
//! schema the durable log ever speaks; everything else (the SQLite
//! projection, in-memory caches) is rebuildable from a replay of these
//! records in file order.

use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, Presence};
use crate::claim::ClaimType;
use crate::fave::FaveItemType;
use crate::message::{MessageId, MsgType};
use crate::question::QuestionGuid;
use crate::subscription::Pin;
use crate::thread::{ThreadGuid, ThreadStatus, ThreadType};
use crate::trigger::TriggerKind;
use crate::wake::{WakeId, WakePersistence, WakeType};

/// Every record appended to a stream's log file.
///
/// Unknown `type` tags fail to deserialize rather than silently becoming a
/// catch-all variant — the log replayer treats that as corruption and skips
/// the record (§4.1), it does not invent semantics for events it can't name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- agent --
    #[serde(rename = "agent:register")]
    AgentRegister {
        agent_id: AgentId,
        #[serde(default)]
        purpose: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
        managed: bool,
        at: u64,
    },

    #[serde(rename = "agent:presence")]
    AgentPresence {
        agent_id: AgentId,
        from: Presence,
        to: Presence,
        at: u64,
        #[serde(default)]
        reason: Option<String>,
    },

    #[serde(rename = "agent:heartbeat")]
    AgentHeartbeat { agent_id: AgentId, at: u64 },

    #[serde(rename = "agent:set_status")]
    AgentSetStatus {
        agent_id: AgentId,
        #[serde(default)]
        status: Option<Option<String>>,
        at: u64,
    },

    #[serde(rename = "agent:leave")]
    AgentLeave { agent_id: AgentId, at: u64 },

    // -- message --
    #[serde(rename = "message:post")]
    MessagePost {
        id: MessageId,
        from_agent: AgentId,
        body: String,
        home: String,
        #[serde(default)]
        reply_to: Option<MessageId>,
        #[serde(default)]
        references: Vec<MessageId>,
        #[serde(default)]
        mentions: Vec<String>,
        msg_type: MsgType,
        ts: u64,
    },

    #[serde(rename = "message:edit")]
    MessageEdit {
        id: MessageId,
        body: String,
        at: u64,
    },

    #[serde(rename = "message:react")]
    MessageReact {
        id: MessageId,
        agent_id: AgentId,
        reaction: String,
        at: u64,
    },

    #[serde(rename = "message:unreact")]
    MessageUnreact {
        id: MessageId,
        agent_id: AgentId,
        reaction: String,
        at: u64,
    },

    #[serde(rename = "message:pin")]
    MessagePin { pin: Pin, agent_id: AgentId, at: u64 },

    #[serde(rename = "message:unpin")]
    MessageUnpin { pin: Pin, agent_id: AgentId, at: u64 },

    #[serde(rename = "message:move")]
    MessageMove {
        id: MessageId,
        to_home: String,
        at: u64,
    },

    #[serde(rename = "message:delete")]
    MessageDelete {
        id: MessageId,
        tombstone_body: String,
        at: u64,
    },

    // -- thread --
    #[serde(rename = "thread:create")]
    ThreadCreate {
        guid: ThreadGuid,
        name: String,
        #[serde(default)]
        parent_thread: Option<ThreadGuid>,
        thread_type: ThreadType,
        at: u64,
    },

    #[serde(rename = "thread:rename")]
    ThreadRename {
        guid: ThreadGuid,
        name: String,
        at: u64,
    },

    #[serde(rename = "thread:set_status")]
    ThreadSetStatus {
        guid: ThreadGuid,
        status: ThreadStatus,
        at: u64,
    },

    #[serde(rename = "thread:set_anchor")]
    ThreadSetAnchor {
        guid: ThreadGuid,
        #[serde(default)]
        anchor_message_guid: Option<MessageId>,
        anchor_hidden: bool,
        at: u64,
    },

    #[serde(rename = "thread:subscribe")]
    ThreadSubscribe {
        guid: ThreadGuid,
        agent_id: AgentId,
        at: u64,
    },

    #[serde(rename = "thread:unsubscribe")]
    ThreadUnsubscribe {
        guid: ThreadGuid,
        agent_id: AgentId,
        at: u64,
    },

    #[serde(rename = "thread:mute")]
    ThreadMute {
        guid: ThreadGuid,
        agent_id: AgentId,
        #[serde(default)]
        expires_at: Option<u64>,
        at: u64,
    },

    #[serde(rename = "thread:unmute")]
    ThreadUnmute {
        guid: ThreadGuid,
        agent_id: AgentId,
        at: u64,
    },

    // -- read state --
    #[serde(rename = "watermark:advance")]
    WatermarkAdvance {
        agent_id: AgentId,
        home: String,
        message_guid: MessageId,
        message_ts: u64,
    },

    #[serde(rename = "ghost_cursor:set")]
    GhostCursorSet {
        agent_id: AgentId,
        home: String,
        message_guid: MessageId,
        must_read: bool,
        set_at: u64,
    },

    #[serde(rename = "ghost_cursor:ack")]
    GhostCursorAck {
        agent_id: AgentId,
        home: String,
        session_ack_at: u64,
    },

    // -- wake conditions --
    #[serde(rename = "wake:set")]
    WakeSet {
        id: WakeId,
        agent_id: AgentId,
        wake_type: WakeType,
        persistence: WakePersistence,
        #[serde(default)]
        home: Option<String>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        fire_at: Option<u64>,
        #[serde(default)]
        on_agents: Vec<String>,
        at: u64,
    },

    #[serde(rename = "wake:fire")]
    WakeFire { id: WakeId, at: u64 },

    #[serde(rename = "wake:pause")]
    WakePause { id: WakeId, at: u64 },

    #[serde(rename = "wake:clear")]
    WakeClear { id: WakeId, at: u64 },

    // -- questions --
    #[serde(rename = "question:asked")]
    QuestionAsked {
        guid: QuestionGuid,
        asked_by: AgentId,
        asked_of: AgentId,
        message_guid: MessageId,
        asked_in: u64,
    },

    #[serde(rename = "question:answered")]
    QuestionAnswered {
        guid: QuestionGuid,
        answer_message_guid: MessageId,
        answered_in: u64,
    },

    // -- claims, mutes elsewhere, faves --
    #[serde(rename = "claim:set")]
    ClaimSet {
        agent_id: AgentId,
        claim_type: ClaimType,
        pattern: String,
        #[serde(default)]
        reason: Option<String>,
        #[serde(default)]
        expires_at: Option<u64>,
        at: u64,
    },

    #[serde(rename = "claim:release")]
    ClaimRelease {
        agent_id: AgentId,
        pattern: String,
        at: u64,
    },

    #[serde(rename = "fave:set")]
    FaveSet {
        agent_id: AgentId,
        item_type: FaveItemType,
        item_guid: String,
        at: u64,
    },

    #[serde(rename = "fave:unset")]
    FaveUnset {
        agent_id: AgentId,
        item_type: FaveItemType,
        item_guid: String,
        at: u64,
    },

    // -- daemon-authored visibility records --
    #[serde(rename = "trigger")]
    Trigger {
        agent_id: AgentId,
        kind: TriggerKind,
        #[serde(default)]
        source_message_guid: Option<MessageId>,
        at: u64,
    },

    // -- configuration --
    #[serde(rename = "config:set")]
    ConfigSet {
        key: String,
        value: String,
        at: u64,
    },

    // -- pruning --
    #[serde(rename = "prune:tombstone")]
    PruneTombstone {
        id: MessageId,
        reason: String,
        at: u64,
    },
}

impl Event {
    /// The timestamp every variant carries, regardless of field name — used
    /// by the log reader to order records that share a millisecond.
    pub fn at(&self) -> u64 {
        match self {
            Event::AgentRegister { at, .. }
            | Event::AgentPresence { at, .. }
            | Event::AgentHeartbeat { at, .. }
            | Event::AgentSetStatus { at, .. }
            | Event::AgentLeave { at, .. }
            | Event::MessageEdit { at, .. }
            | Event::MessageReact { at, .. }
            | Event::MessageUnreact { at, .. }
            | Event::MessagePin { at, .. }
            | Event::MessageUnpin { at, .. }
            | Event::MessageMove { at, .. }
            | Event::MessageDelete { at, .. }
            | Event::ThreadCreate { at, .. }
            | Event::ThreadRename { at, .. }
            | Event::ThreadSetStatus { at, .. }
            | Event::ThreadSetAnchor { at, .. }
            | Event::ThreadSubscribe { at, .. }
            | Event::ThreadUnsubscribe { at, .. }
            | Event::ThreadMute { at, .. }
            | Event::ThreadUnmute { at, .. }
            | Event::WakeSet { at, .. }
            | Event::WakeFire { at, .. }
            | Event::WakePause { at, .. }
            | Event::WakeClear { at, .. }
            | Event::ClaimSet { at, .. }
            | Event::ClaimRelease { at, .. }
            | Event::FaveSet { at, .. }
            | Event::FaveUnset { at, .. }
            | Event::Trigger { at, .. }
            | Event::ConfigSet { at, .. }
            | Event::PruneTombstone { at, .. } => *at,
            Event::MessagePost { ts, .. } => *ts,
            Event::WatermarkAdvance { message_ts, .. } => *message_ts,
            Event::GhostCursorSet { set_at, .. } => *set_at,
            Event::GhostCursorAck { session_ack_at, .. } => *session_ack_at,
            Event::QuestionAsked { asked_in, .. } => *asked_in,
            Event::QuestionAnswered { answered_in, .. } => *answered_in,
        }
    }

    /// The stream this record belongs to, i.e. which per-agent or shared log
    /// file it is appended to (§4.1). Message/thread/room activity shares the
    /// `"room"` stream; per-agent records use the agent's id.
    pub fn stream(&self) -> &str {
        match self {
            Event::AgentRegister { agent_id, .. }
            | Event::AgentPresence { agent_id, .. }
            | Event::AgentHeartbeat { agent_id, .. }
            | Event::AgentSetStatus { agent_id, .. }
            | Event::AgentLeave { agent_id, .. } => agent_id.as_str(),
            _ => "room",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
