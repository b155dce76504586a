// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Interrupt grammar: `!{1,2}@<agent>(!?)` parsed from message bodies.
//!
//! - `!@agent`   -- interrupt, resume the agent's existing session.
//! - `!!@agent`  -- interrupt, start a fresh session (clear `last_session_id`).
//! - `!@agent!`  -- interrupt, resume, but do not spawn again after exit.
//! - `!!@agent!` -- force-end: fresh session semantics and do not restart.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    Resume,
    Fresh,
    ResumeNoRespawn,
    ForceEnd,
}

impl InterruptKind {
    /// Whether this interrupt clears the agent's `last_session_id` and
    /// starts a fresh session rather than resuming.
    pub fn starts_fresh(self) -> bool {
        matches!(self, InterruptKind::Fresh | InterruptKind::ForceEnd)
    }

    /// Whether the daemon should spawn again once the interrupted process
    /// exits.
    pub fn respawns(self) -> bool {
        matches!(self, InterruptKind::Resume | InterruptKind::Fresh)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interrupt {
    pub agent: String,
    pub kind: InterruptKind,
}

fn interrupt_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?P<bang>!{1,2})@(?P<agent>[a-zA-Z][a-zA-Z0-9_.-]*)(?P<trail>!?)")
            .expect("interrupt grammar regex is valid")
    })
}

/// Extract every interrupt directive from a message body, in order of
/// appearance. Lowercases agent names for comparison against registered IDs.
pub fn parse(body: &str) -> Vec<Interrupt> {
    interrupt_regex()
        .captures_iter(body)
        .map(|cap| {
            let double = cap["bang"].len() == 2;
            let trailing_bang = !cap["trail"].is_empty();
            let kind = match (double, trailing_bang) {
                (false, false) => InterruptKind::Resume,
                (true, false) => InterruptKind::Fresh,
                (false, true) => InterruptKind::ResumeNoRespawn,
                (true, true) => InterruptKind::ForceEnd,
            };
            Interrupt {
                agent: cap["agent"].to_lowercase(),
                kind,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "interrupt_tests.rs"]
mod tests;
