// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Fave entity (§3 Fave): a toggled (agent, item) favorite.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaveItemType {
    Message,
    Thread,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fave {
    pub agent: String,
    pub item_type: FaveItemType,
    pub item_guid: String,
}

#[cfg(test)]
#[path = "fave_tests.rs"]
mod tests;
