// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

use thiserror::Error;

use agentbus_core::CoreError;
use agentbus_storage::StorageError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("message not found: {0}")]
    MessageNotFound(String),
    #[error("thread not found: {0}")]
    ThreadNotFound(String),
    #[error("{0} is not repliable (tombstoned)")]
    NotRepliable(String),
    #[error("guard refused the operation: {0}")]
    GuardRefused(String),
}
