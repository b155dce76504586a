// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Single-instance lock: only one daemon may own a project's `.agentbus`
//! directory at a time. Acquired via an exclusive advisory lock on the PID
//! file, held for the daemon's lifetime, released on drop.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::DaemonError;

pub struct DaemonLock {
    path: PathBuf,
    // Held to maintain the exclusive file lock; released on drop.
    #[allow(dead_code)]
    file: File,
}

impl DaemonLock {
    /// Acquire the lock at `lock_path`, creating the file (and its parent
    /// directory) if needed. Writes the current PID into the file once the
    /// lock is held.
    pub fn acquire(lock_path: &Path) -> Result<Self, DaemonError> {
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Avoid truncating before we hold the lock — that would wipe the
        // running daemon's PID out from under it.
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;
        file.try_lock_exclusive()
            .map_err(|e| DaemonError::LockFailed(lock_path.to_path_buf(), e))?;

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self {
            path: lock_path.to_path_buf(),
            file,
        })
    }

    /// PID recorded in an existing lock file, if any (used to report who
    /// currently holds the lock when acquisition fails).
    pub fn read_holder_pid(lock_path: &Path) -> Option<u32> {
        std::fs::read_to_string(lock_path)
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    /// Acquire the lock, signaling and waiting out a stale holder first if
    /// it's still alive. Used for `--force` restarts.
    pub fn force_acquire(lock_path: &Path) -> Result<Self, DaemonError> {
        if let Some(pid) = Self::read_holder_pid(lock_path) {
            let _ = std::process::Command::new("kill")
                .args(["-TERM", &pid.to_string()])
                .status();
        }

        const RETRIES: u32 = 20;
        const RETRY_DELAY: std::time::Duration = std::time::Duration::from_millis(100);
        let mut last_err = None;
        for _ in 0..RETRIES {
            match Self::acquire(lock_path) {
                Ok(lock) => return Ok(lock),
                Err(e) => {
                    last_err = Some(e);
                    std::thread::sleep(RETRY_DELAY);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            DaemonError::LockFailed(
                lock_path.to_path_buf(),
                std::io::Error::other("stale owner did not release the lock"),
            )
        }))
    }
}

impl Drop for DaemonLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
