// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("projection schema is at version {found}, expected {expected} — rebuild required")]
    SchemaDrift { found: i64, expected: i64 },
    #[error("lock on stream {0:?} is held by another process")]
    WouldBlock(String),
}
