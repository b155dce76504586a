// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Shared error taxonomy (§7): validation, not-found, and conflict errors
//! that every layer above the log can raise without side effects.

use thiserror::Error;

/// Errors surfaced by core validation logic (agent/thread name rules,
/// reference ambiguity, etc). Higher layers (engine, daemon) wrap these
/// in their own richer error enums rather than re-deriving the same rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid agent id '{0}': must match ^[a-z][a-z0-9]*(-[a-z0-9]+)*$")]
    InvalidAgentId(String),

    #[error("invalid thread name '{0}': must match ^[a-z0-9][a-z0-9-]*$")]
    InvalidThreadName(String),

    #[error("ambiguous reference '{input}': matches {candidates:?}")]
    AmbiguousReference {
        input: String,
        candidates: Vec<String>,
    },

    #[error("not found: {kind} '{reference}'")]
    NotFound { kind: &'static str, reference: String },

    #[error("did you mean '{suggestion}'? (use --force to use '{input}' as-is)")]
    DidYouMean { input: String, suggestion: String },

    #[error("conflict: {0}")]
    Conflict(String),
}
