// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The driver collaborator: spawns and signals the external process that
//! runs an agent's turn (§4.8). Nothing upstream of this crate knows
//! whether that process is a real subprocess or a test double.

mod driver;
mod process;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DriverCall, FakeDriver};

pub use driver::{Driver, DriverError, DriverHandle, SpawnRequest};
pub use process::ProcessDriver;
