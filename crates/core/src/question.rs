// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Question entity (§3 Question): a blocking ask from one agent to another,
//! tracked from `asked` through `answered`.

use serde::{Deserialize, Serialize};

use crate::message::MessageId;

crate::define_id! {
    /// `q-<ulid-26>` unique question identifier.
    pub struct QuestionGuid;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Open,
    Answered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub guid: QuestionGuid,
    pub asked_by: String,
    pub asked_of: String,
    pub message_guid: MessageId,
    #[serde(default)]
    pub answer_message_guid: Option<MessageId>,
    pub status: QuestionStatus,
    pub asked_in: u64,
    #[serde(default)]
    pub answered_in: Option<u64>,
}

impl Question {
    pub fn is_open(&self) -> bool {
        self.status == QuestionStatus::Open
    }

    /// Answering is idempotent on the guid of the answering message: the
    /// same answer replayed from the log must not flip an already-answered
    /// question back open or stomp an earlier answer with a later one.
    pub fn answer(&mut self, answer_message_guid: MessageId, answered_in: u64) {
        if self.status == QuestionStatus::Answered {
            return;
        }
        self.answer_message_guid = Some(answer_message_guid);
        self.answered_in = Some(answered_in);
        self.status = QuestionStatus::Answered;
    }
}

#[cfg(test)]
#[path = "question_tests.rs"]
mod tests;
