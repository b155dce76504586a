// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! The append-only event log (C1): one JSONL file per stream, each append
//! taking an exclusive file lock for the duration of the write so that many
//! independent processes can append to the same project directory without a
//! single daemon brokering every write.
//!
//! Corrupt lines are skipped and logged rather than treated as the end of
//! the stream — a multi-writer log can have a reader observe a line mid
//! write from another process, and that must not stall replay of everything
//! written after it.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use agentbus_core::Event;
use fs2::FileExt;
use tracing::warn;

use crate::error::StorageError;

/// Stream name the pruning engine archives dropped records into. Excluded
/// from [`EventLog::streams`]/[`EventLog::read_all_sorted`] so an archived
/// record never comes back to life on the next projection rebuild.
const HISTORY_STREAM: &str = "history";

pub struct EventLog {
    root: PathBuf,
}

impl EventLog {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn stream_path(&self, stream: &str) -> PathBuf {
        self.root.join(format!("{stream}.jsonl"))
    }

    /// Append one record to `event.stream()`'s file, holding an exclusive
    /// lock for the write so concurrent appenders from other processes
    /// serialize rather than interleave partial lines.
    pub fn append(&self, event: &Event) -> Result<(), StorageError> {
        let path = self.stream_path(event.stream());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        file.lock_exclusive()?;
        let result = (|| -> Result<(), StorageError> {
            let mut line = serde_json::to_vec(event)?;
            line.push(b'\n');
            file.write_all(&line)?;
            file.sync_all()?;
            Ok(())
        })();
        FileExt::unlock(&file)?;
        result
    }

    /// All known stream names, derived from the `.jsonl` files present.
    /// `history` is excluded: it holds pruned-away records the pruning
    /// engine archived, not live stream state, and must never be replayed
    /// back into the projection.
    pub fn streams(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if stem != HISTORY_STREAM {
                        names.push(stem.to_string());
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read every parseable record from a single stream, in file order.
    /// Unparseable lines are skipped with a warning, not treated as EOF.
    pub fn read_stream(&self, stream: &str) -> Result<Vec<Event>, StorageError> {
        let path = self.stream_path(stream);
        read_stream_file(&path)
    }

    /// Read every parseable record across every stream, ordered by the
    /// record's own timestamp and then by stream name to break ties
    /// deterministically. This ordering is "as written, single-machine"; the
    /// engine does not attempt clock-skew reconciliation across machines.
    pub fn read_all_sorted(&self) -> Result<Vec<Event>, StorageError> {
        let mut all = Vec::new();
        for stream in self.streams()? {
            for event in self.read_stream(&stream)? {
                all.push((stream.clone(), event));
            }
        }
        all.sort_by(|a, b| a.1.at().cmp(&b.1.at()).then_with(|| a.0.cmp(&b.0)));
        Ok(all.into_iter().map(|(_, e)| e).collect())
    }

    /// Rewrites `stream`, keeping only the events `keep` accepts, archiving
    /// everything dropped into the `history` stream first (or discarding
    /// `history` entirely when `delete_history` is set), then appending
    /// `tail` to the rewritten stream. Used by the pruning engine to turn
    /// archived messages into durable history without ever holding both the
    /// pre- and post-rewrite state in memory at once for longer than a
    /// single lock hold.
    ///
    /// Holds an exclusive lock on `stream`'s file for the whole operation so
    /// a concurrent appender observes either the pre- or post-rewrite state,
    /// never a partial one.
    pub fn archive_and_rewrite(
        &self,
        stream: &str,
        delete_history: bool,
        keep: impl Fn(&Event) -> bool,
        tail: &[Event],
    ) -> Result<(), StorageError> {
        let path = self.stream_path(stream);
        let lock_file = OpenOptions::new().create(true).append(true).open(&path)?;
        lock_file.lock_exclusive()?;
        let result = self.archive_and_rewrite_locked(&path, delete_history, keep, tail);
        FileExt::unlock(&lock_file)?;
        result
    }

    fn archive_and_rewrite_locked(
        &self,
        path: &Path,
        delete_history: bool,
        keep: impl Fn(&Event) -> bool,
        tail: &[Event],
    ) -> Result<(), StorageError> {
        let existing = read_stream_file(path)?;
        let mut kept = Vec::with_capacity(existing.len());
        let mut dropped = Vec::new();
        for event in existing {
            if keep(&event) {
                kept.push(event);
            } else {
                dropped.push(event);
            }
        }

        let history_path = self.stream_path(HISTORY_STREAM);
        if delete_history {
            match fs::remove_file(&history_path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        } else if !dropped.is_empty() {
            append_events(&history_path, &dropped)?;
        }

        let mut out = Vec::new();
        for event in kept.iter().chain(tail.iter()) {
            let mut line = serde_json::to_vec(event)?;
            line.push(b'\n');
            out.extend(line);
        }
        let tmp_path = path.with_extension("jsonl.tmp");
        fs::write(&tmp_path, &out)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

/// Appends pre-serialized `events` to `path` under its own exclusive lock,
/// independent of whatever lock the caller already holds on a different file.
fn append_events(path: &Path, events: &[Event]) -> Result<(), StorageError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;
    let result = (|| -> Result<(), StorageError> {
        let mut out = Vec::new();
        for event in events {
            let mut line = serde_json::to_vec(event)?;
            line.push(b'\n');
            out.extend(line);
        }
        let mut file = &file;
        file.write_all(&out)?;
        file.sync_all()?;
        Ok(())
    })();
    FileExt::unlock(&file)?;
    result
}

fn read_stream_file(path: &Path) -> Result<Vec<Event>, StorageError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let reader = BufReader::new(file);
    let mut events = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(trimmed) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping unparseable event log line",
                );
            }
        }
    }
    Ok(events)
}

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;
