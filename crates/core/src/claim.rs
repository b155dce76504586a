// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Claim entity (§3 Claim): exclusive-intent signal with no enforced locking.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    File,
    Bd,
    Issue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub agent: String,
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    pub pattern: String,
    #[serde(default)]
    pub reason: Option<String>,
    pub created_at: u64,
    #[serde(default)]
    pub expires_at: Option<u64>,
}

impl Claim {
    /// Expired claims are pruned lazily on access — this is the predicate
    /// callers use to filter them out rather than a background sweep.
    pub fn is_expired(&self, now: u64) -> bool {
        matches!(self.expires_at, Some(exp) if now >= exp)
    }
}

#[cfg(test)]
#[path = "claim_tests.rs"]
mod tests;
