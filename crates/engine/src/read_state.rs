// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! C5: watermark and ghost-cursor operations.

use agentbus_core::{AgentId, Clock, Event, MessageId, Watermark};
use agentbus_storage::{EventLog, Projection};
use rusqlite::OptionalExtension;

use crate::error::EngineError;

fn current_watermark(
    projection: &Projection,
    agent_id: &AgentId,
    home: &str,
) -> Result<Option<Watermark>, EngineError> {
    let row = projection
        .conn()
        .query_row(
            "SELECT message_guid, message_ts FROM watermarks WHERE agent_id = ?1 AND home = ?2",
            [agent_id.as_str(), home],
            |r| {
                let guid: String = r.get(0)?;
                let ts: i64 = r.get(1)?;
                Ok((guid, ts))
            },
        )
        .optional()?;
    Ok(row.map(|(guid, ts)| Watermark {
        agent: agent_id.to_string(),
        home: home.to_string(),
        message_guid: MessageId::new(guid),
        message_ts: ts as u64,
    }))
}

/// Advances the agent's watermark for `home` if `(message_ts, message_guid)`
/// is not behind the current one (§3, §8 monotonicity). A regression is a
/// silent no-op, not an error — replays and out-of-order deliveries must not
/// crash the caller.
pub fn advance_watermark(
    log: &EventLog,
    projection: &mut Projection,
    agent_id: &AgentId,
    home: &str,
    message_guid: &MessageId,
    message_ts: u64,
) -> Result<bool, EngineError> {
    if let Some(current) = current_watermark(projection, agent_id, home)? {
        if !current.allows_advance_to(message_ts, message_guid) {
            return Ok(false);
        }
    }
    let event = Event::WatermarkAdvance {
        agent_id: agent_id.clone(),
        home: home.to_string(),
        message_guid: message_guid.clone(),
        message_ts,
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(true)
}

pub fn set_ghost_cursor(
    log: &EventLog,
    agent_id: &AgentId,
    home: &str,
    message_guid: &MessageId,
    must_read: bool,
    clock: &dyn Clock,
) -> Result<(), EngineError> {
    let event = Event::GhostCursorSet {
        agent_id: agent_id.clone(),
        home: home.to_string(),
        message_guid: message_guid.clone(),
        must_read,
        set_at: clock.now_ms(),
    };
    log.append(&event)?;
    Ok(())
}

pub fn ack_ghost_cursor(
    log: &EventLog,
    agent_id: &AgentId,
    home: &str,
    clock: &dyn Clock,
) -> Result<(), EngineError> {
    let event = Event::GhostCursorAck {
        agent_id: agent_id.clone(),
        home: home.to_string(),
        session_ack_at: clock.now_ms(),
    };
    log.append(&event)?;
    Ok(())
}

#[cfg(test)]
#[path = "read_state_tests.rs"]
mod tests;
