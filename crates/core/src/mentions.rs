// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Mention extraction (§3 Message.mentions, §4.4): scans message bodies for
//! `@name` tokens and the `@all` broadcast sentinel.

use std::sync::OnceLock;

/// Broadcast sentinel: mentions every active agent rather than one agent.
pub const ALL: &str = "all";

fn mention_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"@([a-zA-Z][a-zA-Z0-9_.-]*)").expect("static regex is valid")
    })
}

/// Extracts `@name` tokens from `body`, lowercased, deduplicated, and in
/// first-occurrence order. `@all` is included verbatim as `"all"` — callers
/// expand it against the live roster rather than here, since extraction must
/// not depend on storage state.
pub fn extract(body: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for cap in mention_regex().captures_iter(body) {
        let name = cap[1].to_lowercase();
        if seen.insert(name.clone()) {
            out.push(name);
        }
    }
    out
}

pub fn mentions_all(mentions: &[String]) -> bool {
    mentions.iter().any(|m| m == ALL)
}

#[cfg(test)]
#[path = "mentions_tests.rs"]
mod tests;
