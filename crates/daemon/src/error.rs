// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("could not determine project root")]
    NoProjectRoot,

    #[error("failed to acquire lock at {0}: daemon already running?")]
    LockFailed(PathBuf, #[source] std::io::Error),

    #[error("storage error: {0}")]
    Storage(#[from] agentbus_storage::StorageError),

    #[error("engine error: {0}")]
    Engine(#[from] agentbus_engine::EngineError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
