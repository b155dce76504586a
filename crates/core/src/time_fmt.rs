// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Shared human-readable duration formatting and the canonical
//! "time unit by field name" table (§6 Ambient, §9 Open Questions).

/// Unit a given C1 field's timestamp is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Millis,
}

/// Canonical lookup for which unit a named field uses, so call sites never
/// have to guess. Unknown field names default to `Seconds`.
pub fn unit_for_field(field: &str) -> TimeUnit {
    match field {
        "set_at" | "read_at" | "session_ack_at" => TimeUnit::Millis,
        _ => TimeUnit::Seconds,
    }
}

/// Format seconds as a short human-readable duration: `"5s"`, `"2m"`, `"1h30m"`, `"3d"`.
///
/// For the hours range, minutes are included when non-zero (e.g. `"1h"` vs `"1h5m"`).
pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        if m > 0 {
            format!("{}h{}m", h, m)
        } else {
            format!("{}h", h)
        }
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Format milliseconds as a short human-readable duration.
pub fn format_elapsed_ms(ms: u64) -> String {
    format_elapsed(ms / 1000)
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
