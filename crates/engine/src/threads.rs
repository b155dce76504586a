// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! C4: thread operations.

use agentbus_core::{sanitize_thread_name, validate_thread_name, Clock, Event, IdGen, ThreadGuid, ThreadStatus, ThreadType};
use agentbus_storage::{EventLog, Projection};

use crate::error::EngineError;

pub fn create_thread(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    id_gen: &dyn IdGen,
    name: &str,
    parent_thread: Option<ThreadGuid>,
    thread_type: ThreadType,
) -> Result<ThreadGuid, EngineError> {
    let sanitized = sanitize_thread_name(name);
    validate_thread_name(&sanitized)?;
    let guid = ThreadGuid::new(format!("thrd-{}", id_gen.next()));
    let event = Event::ThreadCreate {
        guid: guid.clone(),
        name: sanitized,
        parent_thread,
        thread_type,
        at: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(guid)
}

pub fn rename_thread(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    guid: &ThreadGuid,
    name: &str,
) -> Result<(), EngineError> {
    let sanitized = sanitize_thread_name(name);
    validate_thread_name(&sanitized)?;
    let event = Event::ThreadRename {
        guid: guid.clone(),
        name: sanitized,
        at: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(())
}

pub fn set_thread_status(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    guid: &ThreadGuid,
    status: ThreadStatus,
) -> Result<(), EngineError> {
    let event = Event::ThreadSetStatus {
        guid: guid.clone(),
        status,
        at: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(())
}

#[cfg(test)]
#[path = "threads_tests.rs"]
mod tests;
