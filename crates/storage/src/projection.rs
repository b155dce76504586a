// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! The SQLite projection (C2): a disposable, rebuildable read index over the
//! event log. Nothing here is a source of truth — on schema drift or
//! suspected corruption the caller drops the file and calls
//! [`Projection::rebuild_from_log`] again.

use rusqlite::{params, Connection};

use agentbus_core::{Event, Presence};

use crate::error::StorageError;

/// Bump whenever the table layout changes; `open` refuses to reuse a file
/// stamped with a different version so stale schemas fail loudly instead of
/// silently returning wrong projections.
const SCHEMA_VERSION: i64 = 1;

pub struct Projection {
    conn: Connection,
}

impl Projection {
    pub fn open(path: &std::path::Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        let mut projection = Self { conn };
        projection.ensure_schema()?;
        Ok(projection)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let mut projection = Self { conn };
        projection.ensure_schema()?;
        Ok(projection)
    }

    fn ensure_schema(&mut self) -> Result<(), StorageError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT version FROM schema_meta LIMIT 1",
                [],
                |row| row.get(0),
            )
            .ok();

        match found {
            None => self.create_schema(),
            Some(v) if v == SCHEMA_VERSION => Ok(()),
            Some(found) => Err(StorageError::SchemaDrift {
                found,
                expected: SCHEMA_VERSION,
            }),
        }
    }

    fn create_schema(&mut self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS schema_meta (version INTEGER NOT NULL);
            CREATE TABLE IF NOT EXISTS agents (
                agent_id TEXT PRIMARY KEY,
                presence TEXT NOT NULL,
                status TEXT,
                purpose TEXT,
                avatar TEXT,
                registered_at INTEGER NOT NULL,
                last_seen INTEGER NOT NULL,
                left_at INTEGER,
                managed INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                ts INTEGER NOT NULL,
                from_agent TEXT NOT NULL,
                body TEXT NOT NULL,
                home TEXT NOT NULL,
                reply_to TEXT,
                msg_type TEXT NOT NULL,
                archived_at INTEGER,
                edited_at INTEGER,
                edit_count INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS messages_home_ts ON messages(home, ts);
            CREATE TABLE IF NOT EXISTS threads (
                guid TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                parent_thread TEXT,
                status TEXT NOT NULL,
                thread_type TEXT NOT NULL,
                last_activity_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS watermarks (
                agent_id TEXT NOT NULL,
                home TEXT NOT NULL,
                message_guid TEXT NOT NULL,
                message_ts INTEGER NOT NULL,
                PRIMARY KEY (agent_id, home)
            );
            CREATE TABLE IF NOT EXISTS questions (
                guid TEXT PRIMARY KEY,
                asked_by TEXT NOT NULL,
                asked_of TEXT NOT NULL,
                message_guid TEXT NOT NULL,
                answer_message_guid TEXT,
                status TEXT NOT NULL,
                asked_in INTEGER NOT NULL,
                answered_in INTEGER
            );
            ",
        )?;
        self.conn.execute(
            "INSERT INTO schema_meta (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Replay `events` against a freshly created schema, in the order given
    /// by the caller (typically [`crate::EventLog::read_all_sorted`]).
    pub fn rebuild_from_log(
        path: &std::path::Path,
        events: &[Event],
    ) -> Result<Self, StorageError> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        let mut projection = Self::open(path)?;
        for event in events {
            projection.apply(event)?;
        }
        Ok(projection)
    }

    pub fn apply(&mut self, event: &Event) -> Result<(), StorageError> {
        match event {
            Event::AgentRegister {
                agent_id,
                purpose,
                avatar,
                managed,
                at,
            } => {
                self.conn.execute(
                    "INSERT INTO agents
                        (agent_id, presence, status, purpose, avatar, registered_at, last_seen, left_at, managed)
                     VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?5, NULL, ?6)
                     ON CONFLICT(agent_id) DO UPDATE SET
                        presence = excluded.presence,
                        purpose = excluded.purpose,
                        avatar = excluded.avatar,
                        last_seen = excluded.last_seen",
                    params![
                        agent_id.as_str(),
                        presence_str(Presence::Offline),
                        purpose,
                        avatar,
                        *at as i64,
                        *managed as i64,
                    ],
                )?;
            }
            Event::AgentPresence { agent_id, to, at, .. } => {
                self.conn.execute(
                    "UPDATE agents SET presence = ?1, last_seen = ?2 WHERE agent_id = ?3",
                    params![presence_str(*to), *at as i64, agent_id.as_str()],
                )?;
            }
            Event::AgentHeartbeat { agent_id, at } => {
                self.conn.execute(
                    "UPDATE agents SET last_seen = ?1 WHERE agent_id = ?2",
                    params![*at as i64, agent_id.as_str()],
                )?;
            }
            Event::AgentSetStatus { agent_id, status, .. } => {
                if let Some(status) = status {
                    self.conn.execute(
                        "UPDATE agents SET status = ?1 WHERE agent_id = ?2",
                        params![status.as_deref(), agent_id.as_str()],
                    )?;
                }
            }
            Event::AgentLeave { agent_id, at } => {
                self.conn.execute(
                    "UPDATE agents SET presence = ?1, left_at = ?2 WHERE agent_id = ?3",
                    params![presence_str(Presence::Offline), *at as i64, agent_id.as_str()],
                )?;
            }
            Event::MessagePost {
                id,
                from_agent,
                body,
                home,
                reply_to,
                msg_type,
                ts,
                ..
            } => {
                self.conn.execute(
                    "INSERT INTO messages (id, ts, from_agent, body, home, reply_to, msg_type, edit_count)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)
                     ON CONFLICT(id) DO NOTHING",
                    params![
                        id.as_str(),
                        *ts as i64,
                        from_agent.as_str(),
                        body,
                        home,
                        reply_to.as_ref().map(|m| m.as_str()),
                        msg_type_str(*msg_type),
                    ],
                )?;
            }
            Event::MessageEdit { id, body, at } => {
                self.conn.execute(
                    "UPDATE messages SET body = ?1, edited_at = ?2, edit_count = edit_count + 1 WHERE id = ?3",
                    params![body, *at as i64, id.as_str()],
                )?;
            }
            Event::MessageMove { id, to_home, at: _ } => {
                self.conn.execute(
                    "UPDATE messages SET home = ?1 WHERE id = ?2",
                    params![to_home, id.as_str()],
                )?;
            }
            Event::MessageDelete {
                id,
                tombstone_body,
                at,
            } => {
                self.conn.execute(
                    "UPDATE messages SET body = ?1, msg_type = ?2, archived_at = ?3 WHERE id = ?4",
                    params![
                        tombstone_body,
                        msg_type_str(agentbus_core::MsgType::Tombstone),
                        *at as i64,
                        id.as_str(),
                    ],
                )?;
            }
            Event::ThreadCreate {
                guid,
                name,
                parent_thread,
                thread_type,
                at,
            } => {
                self.conn.execute(
                    "INSERT INTO threads (guid, name, parent_thread, status, thread_type, last_activity_at)
                     VALUES (?1, ?2, ?3, 'open', ?4, ?5)
                     ON CONFLICT(guid) DO NOTHING",
                    params![
                        guid.as_str(),
                        name,
                        parent_thread.as_ref().map(|p| p.as_str()),
                        thread_type_str(*thread_type),
                        *at as i64,
                    ],
                )?;
            }
            Event::ThreadRename { guid, name, .. } => {
                self.conn.execute(
                    "UPDATE threads SET name = ?1 WHERE guid = ?2",
                    params![name, guid.as_str()],
                )?;
            }
            Event::ThreadSetStatus { guid, status, .. } => {
                self.conn.execute(
                    "UPDATE threads SET status = ?1 WHERE guid = ?2",
                    params![thread_status_str(*status), guid.as_str()],
                )?;
            }
            Event::WatermarkAdvance {
                agent_id,
                home,
                message_guid,
                message_ts,
            } => {
                self.conn.execute(
                    "INSERT INTO watermarks (agent_id, home, message_guid, message_ts)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(agent_id, home) DO UPDATE SET
                        message_guid = excluded.message_guid,
                        message_ts = excluded.message_ts
                     WHERE excluded.message_ts > watermarks.message_ts
                        OR (excluded.message_ts = watermarks.message_ts
                            AND excluded.message_guid > watermarks.message_guid)",
                    params![
                        agent_id.as_str(),
                        home,
                        message_guid.as_str(),
                        *message_ts as i64,
                    ],
                )?;
            }
            Event::QuestionAsked {
                guid,
                asked_by,
                asked_of,
                message_guid,
                asked_in,
            } => {
                self.conn.execute(
                    "INSERT INTO questions (guid, asked_by, asked_of, message_guid, status, asked_in)
                     VALUES (?1, ?2, ?3, ?4, 'open', ?5)
                     ON CONFLICT(guid) DO NOTHING",
                    params![
                        guid.as_str(),
                        asked_by.as_str(),
                        asked_of.as_str(),
                        message_guid.as_str(),
                        *asked_in as i64,
                    ],
                )?;
            }
            Event::QuestionAnswered {
                guid,
                answer_message_guid,
                answered_in,
            } => {
                self.conn.execute(
                    "UPDATE questions SET status = 'answered', answer_message_guid = ?1, answered_in = ?2
                     WHERE guid = ?3 AND status = 'open'",
                    params![answer_message_guid.as_str(), *answered_in as i64, guid.as_str()],
                )?;
            }
            // Reactions, pins, mutes, claims, faves, wake conditions, ghost
            // cursors, trigger/config/prune records are read directly from
            // the event log by the engine rather than projected into their
            // own tables — they do not need indexed point lookups the way
            // messages, threads, agents, watermarks and questions do.
            _ => {}
        }
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn presence_str(p: Presence) -> &'static str {
    match p {
        Presence::Offline => "offline",
        Presence::Spawning => "spawning",
        Presence::Active => "active",
        Presence::Idle => "idle",
        Presence::Brb => "brb",
        Presence::Error => "error",
    }
}

fn msg_type_str(t: agentbus_core::MsgType) -> &'static str {
    match t {
        agentbus_core::MsgType::Agent => "agent",
        agentbus_core::MsgType::User => "user",
        agentbus_core::MsgType::Event => "event",
        agentbus_core::MsgType::Tombstone => "tombstone",
    }
}

fn thread_type_str(t: agentbus_core::ThreadType) -> &'static str {
    match t {
        agentbus_core::ThreadType::Knowledge => "knowledge",
        agentbus_core::ThreadType::System => "system",
        agentbus_core::ThreadType::Default => "default",
    }
}

fn thread_status_str(s: agentbus_core::ThreadStatus) -> &'static str {
    match s {
        agentbus_core::ThreadStatus::Open => "open",
        agentbus_core::ThreadStatus::Archived => "archived",
    }
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
