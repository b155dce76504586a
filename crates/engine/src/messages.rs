// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! C4: message operations. Each function appends the authoritative event to
//! the log first, then folds it into the projection — the log write is what
//! makes the operation durable, the projection update just keeps the index
//! in sync for the caller's own next read.

use agentbus_core::{mentions, AgentId, Clock, Event, IdGen, MessageId, MsgType};
use agentbus_storage::{EventLog, Projection};

use crate::error::EngineError;

pub fn post_message(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    id_gen: &dyn IdGen,
    from_agent: &AgentId,
    home: &str,
    body: &str,
    reply_to: Option<MessageId>,
) -> Result<MessageId, EngineError> {
    let id = MessageId::new(format!("msg-{}", id_gen.next()));
    let found_mentions = mentions::extract(body);
    let event = Event::MessagePost {
        id: id.clone(),
        from_agent: from_agent.clone(),
        body: body.to_string(),
        home: home.to_string(),
        reply_to,
        references: Vec::new(),
        mentions: found_mentions,
        msg_type: MsgType::Agent,
        ts: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(id)
}

pub fn edit_message(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    id: &MessageId,
    body: &str,
) -> Result<(), EngineError> {
    let event = Event::MessageEdit {
        id: id.clone(),
        body: body.to_string(),
        at: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(())
}

/// Tombstones a message in place (§4.4, §4.6 invariant iv): the row survives
/// with a tombstone body and `Tombstone` type so replies keep a valid
/// `reply_to` target, but it is no longer repliable.
pub fn delete_message(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    id: &MessageId,
    reason: &str,
) -> Result<(), EngineError> {
    let event = Event::MessageDelete {
        id: id.clone(),
        tombstone_body: format!("[deleted: {reason}]"),
        at: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(())
}

pub fn move_message(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    id: &MessageId,
    to_home: &str,
) -> Result<(), EngineError> {
    let event = Event::MessageMove {
        id: id.clone(),
        to_home: to_home.to_string(),
        at: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(())
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
