// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Question lifecycle: ask and answer, mirroring the idempotent-answer rule
//! in [`agentbus_core::Question::answer`] at the projection layer.

use agentbus_core::{AgentId, Clock, Event, IdGen, MessageId, QuestionGuid};
use agentbus_storage::{EventLog, Projection};

use crate::error::EngineError;

pub fn ask_question(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    id_gen: &dyn IdGen,
    asked_by: &AgentId,
    asked_of: &AgentId,
    message_guid: &MessageId,
) -> Result<QuestionGuid, EngineError> {
    let guid = QuestionGuid::new(format!("q-{}", id_gen.next()));
    let event = Event::QuestionAsked {
        guid: guid.clone(),
        asked_by: asked_by.clone(),
        asked_of: asked_of.clone(),
        message_guid: message_guid.clone(),
        asked_in: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(guid)
}

pub fn answer_question(
    log: &EventLog,
    projection: &mut Projection,
    clock: &dyn Clock,
    guid: &QuestionGuid,
    answer_message_guid: &MessageId,
) -> Result<(), EngineError> {
    let event = Event::QuestionAnswered {
        guid: guid.clone(),
        answer_message_guid: answer_message_guid.clone(),
        answered_in: clock.now_secs(),
    };
    log.append(&event)?;
    projection.apply(&event)?;
    Ok(())
}

#[cfg(test)]
#[path = "questions_tests.rs"]
mod tests;
