// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Thread entity (§3 Thread, §4.4 thread ops, §4.3 name validation).

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::CoreError;
use crate::message::MessageId;

crate::define_id! {
    /// `thrd-<ulid-26>` unique thread identifier.
    pub struct ThreadGuid;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStatus {
    Open,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadType {
    Knowledge,
    System,
    Default,
}

/// A thread (§3 Thread). Nesting is a forest: `parent_thread` must never
/// introduce a cycle (invariant i) and depth is bounded (invariant ii).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub guid: ThreadGuid,
    pub name: String,
    #[serde(default)]
    pub parent_thread: Option<ThreadGuid>,
    pub status: ThreadStatus,
    #[serde(rename = "type")]
    pub thread_type: ThreadType,
    #[serde(default)]
    pub anchor_message_guid: Option<MessageId>,
    #[serde(default)]
    pub anchor_hidden: bool,
    pub last_activity_at: u64,
}

fn thread_name_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("static regex is valid"))
}

/// Validates a thread name is kebab-case per §4.3.
pub fn validate_thread_name(name: &str) -> Result<(), CoreError> {
    if thread_name_regex().is_match(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidThreadName(name.to_string()))
    }
}

/// Sanitize a thread name for create/rename: lowercase, spaces/underscores
/// to hyphens, then re-validate. Per §4.3 this requires explicit user
/// confirmation at the call site before applying — sanitization itself is
/// pure and side-effect free.
pub fn sanitize_thread_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

impl Thread {
    pub fn is_open(&self) -> bool {
        self.status == ThreadStatus::Open
    }

    /// Reserved paths under `meta/{agent}/...` are created only by
    /// agent-creation and role-creation logic (invariant iv); everything
    /// else must reject a user-supplied path starting with `meta/`.
    pub fn is_reserved_path(path: &str) -> bool {
        path.starts_with("meta/")
    }
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod tests;
