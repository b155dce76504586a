// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! C6: the pruning engine. Computes which messages in a home are safe to
//! archive, synthesizes a single summary tombstone for whatever it removes,
//! and gates the whole rewrite behind a [`PruneGuard`] so pruning never runs
//! against a project directory with uncommitted state the operator would
//! want to review first.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::process::Command;

use agentbus_core::{
    AgentId, Clock, Event, Fave, FaveItemType, IdGen, Message, MessageId, MsgType, Pin, Question,
    QuestionGuid, QuestionStatus, Reaction, Thread, ThreadGuid, ThreadStatus,
};
use agentbus_storage::{EventLog, Projection};

use crate::error::EngineError;

/// Gates pruning on the state of the project directory.
pub trait PruneGuard {
    fn check(&self, project_root: &Path) -> Result<(), String>;
}

/// Always allows pruning — used in tests and for projects that don't track
/// the bus directory in git.
pub struct NoopGuard;

impl PruneGuard for NoopGuard {
    fn check(&self, _project_root: &Path) -> Result<(), String> {
        Ok(())
    }
}

/// Refuses to prune unless `git status --porcelain` reports a clean tree and
/// the branch isn't ahead of its upstream, so a crash mid-prune always has a
/// recoverable, pushed commit to diff against.
pub struct GitPorcelainGuard;

impl PruneGuard for GitPorcelainGuard {
    fn check(&self, project_root: &Path) -> Result<(), String> {
        let status = Command::new("git")
            .arg("status")
            .arg("--porcelain")
            .current_dir(project_root)
            .output()
            .map_err(|e| format!("failed to run git: {e}"))?;
        if !status.status.success() {
            return Err("git status failed".to_string());
        }
        if !status.stdout.is_empty() {
            return Err("working tree has uncommitted changes".to_string());
        }

        if let Ok(ahead) = Command::new("git")
            .arg("rev-list")
            .arg("--count")
            .arg("@{u}..")
            .current_dir(project_root)
            .output()
        {
            if ahead.status.success() {
                let count: u64 = String::from_utf8_lossy(&ahead.stdout).trim().parse().unwrap_or(0);
                if count > 0 {
                    return Err("branch is ahead of its upstream".to_string());
                }
            }
        }
        Ok(())
    }
}

/// A default protection class a message can be exempted from via `--with`,
/// or explicitly re-asserted via `--without`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectionClass {
    Replies,
    Faves,
    Reacts,
}

/// Options controlling which messages in a home `prune` selects.
#[derive(Debug, Clone, Default)]
pub struct PruneOptions {
    /// Keep the most recent `N` messages by timestamp; everything older is a
    /// candidate, subject to the required set.
    pub keep_last: Option<usize>,
    /// Keep everything strictly newer than this message; the named message
    /// and everything at or before its timestamp is a candidate.
    pub before: Option<MessageId>,
    /// Protection classes dropped from the default-required set.
    pub with: HashSet<ProtectionClass>,
    /// Protection classes whose matching messages are never pruned, even if
    /// selected by `keep_last`/`before`/`with_react`.
    pub without: HashSet<ProtectionClass>,
    /// Selects messages bearing this reaction for pruning, overriding the
    /// default reacts protection for just those messages.
    pub with_react: Option<String>,
    /// Delete `history.jsonl` outright instead of appending to it.
    pub all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PruneReport {
    pub pruned: usize,
    pub tombstone_id: Option<MessageId>,
}

/// The set of message ids that must never be pruned regardless of any
/// window selection: anchors, pins, question refs, `references`/
/// `surface_message`/`quote_message_guid` targets, plus whichever default
/// protection classes aren't listed in `with`, closed over `reply_to` chains.
pub fn required_message_ids(
    messages: &[Message],
    threads: &[Thread],
    questions: &[Question],
    faves: &[Fave],
    pins: &[Pin],
    with: &HashSet<ProtectionClass>,
) -> HashSet<MessageId> {
    let by_id: HashMap<&MessageId, &Message> = messages.iter().map(|m| (&m.id, m)).collect();
    let mut required: HashSet<MessageId> = HashSet::new();

    for thread in threads {
        if let Some(anchor) = &thread.anchor_message_guid {
            required.insert(anchor.clone());
        }
    }
    for pin in pins {
        if let Pin::Message { message, .. } = pin {
            required.insert(message.clone());
        }
    }
    for question in questions {
        required.insert(question.message_guid.clone());
        if let Some(answer) = &question.answer_message_guid {
            required.insert(answer.clone());
        }
    }
    for message in messages {
        required.extend(message.references.iter().cloned());
        if let Some(surface) = &message.surface_message {
            required.insert(surface.clone());
        }
        if let Some(quoted) = &message.quote_message_guid {
            required.insert(quoted.clone());
        }
    }

    if !with.contains(&ProtectionClass::Replies) {
        required.extend(messages.iter().filter(|m| m.reply_to.is_some()).map(|m| m.id.clone()));
    }
    if !with.contains(&ProtectionClass::Faves) {
        required.extend(faves.iter().filter_map(|f| match f.item_type {
            FaveItemType::Message => Some(MessageId::new(f.item_guid.clone())),
            FaveItemType::Thread => None,
        }));
    }
    if !with.contains(&ProtectionClass::Reacts) {
        required.extend(messages.iter().filter(|m| m.has_reactions()).map(|m| m.id.clone()));
    }

    reply_chain_closure(&mut required, &by_id);
    required
}

/// Repeatedly pulls each required message's `reply_to` target into the set
/// until a fixpoint, so a kept message's whole reply ancestry survives.
fn reply_chain_closure(required: &mut HashSet<MessageId>, by_id: &HashMap<&MessageId, &Message>) {
    loop {
        let mut added = false;
        let frontier: Vec<MessageId> = required.iter().cloned().collect();
        for id in frontier {
            if let Some(message) = by_id.get(&id) {
                if let Some(parent) = &message.reply_to {
                    if required.insert(parent.clone()) {
                        added = true;
                    }
                }
            }
        }
        if !added {
            break;
        }
    }
}

/// Messages in `messages` (already filtered to one home) eligible for
/// pruning under `opts`, honoring the required set, the protection
/// modifiers, and the reply-chain closure over whatever ends up kept.
pub fn prune_candidates(
    messages: &[Message],
    threads: &[Thread],
    questions: &[Question],
    faves: &[Fave],
    pins: &[Pin],
    opts: &PruneOptions,
) -> Vec<MessageId> {
    let by_id: HashMap<&MessageId, &Message> = messages.iter().map(|m| (&m.id, m)).collect();
    let required = required_message_ids(messages, threads, questions, faves, pins, &opts.with);

    let mut selected: HashSet<MessageId> = HashSet::new();
    if let Some(n) = opts.keep_last {
        let mut by_ts: Vec<&Message> = messages.iter().filter(|m| !m.is_tombstone()).collect();
        by_ts.sort_by_key(|m| m.ts);
        let keep: HashSet<MessageId> = by_ts.iter().rev().take(n).map(|m| m.id.clone()).collect();
        selected.extend(by_ts.iter().filter(|m| !keep.contains(&m.id)).map(|m| m.id.clone()));
    } else if let Some(before_id) = &opts.before {
        if let Some(before_msg) = by_id.get(before_id) {
            selected.extend(
                messages
                    .iter()
                    .filter(|m| !m.is_tombstone() && m.ts <= before_msg.ts)
                    .map(|m| m.id.clone()),
            );
        }
    }

    if let Some(reaction) = &opts.with_react {
        selected.extend(
            messages
                .iter()
                .filter(|m| !m.is_tombstone() && m.reactions.get(reaction).is_some_and(|v| !v.is_empty()))
                .map(|m| m.id.clone()),
        );
    }

    // `--with-react` overrides the default reacts protection only for the
    // messages actually carrying that reaction, not the whole class.
    let reacts_exempt: HashSet<MessageId> = match &opts.with_react {
        Some(reaction) => {
            let mut with_reacts_dropped = opts.with.clone();
            with_reacts_dropped.insert(ProtectionClass::Reacts);
            let required_without_reacts =
                required_message_ids(messages, threads, questions, faves, pins, &with_reacts_dropped);
            messages
                .iter()
                .filter(|m| {
                    required.contains(&m.id)
                        && !required_without_reacts.contains(&m.id)
                        && m.reactions.get(reaction).is_some_and(|v| !v.is_empty())
                })
                .map(|m| m.id.clone())
                .collect()
        }
        None => HashSet::new(),
    };

    let mut prune_ids: HashSet<MessageId> = selected
        .into_iter()
        .filter(|id| !required.contains(id) || reacts_exempt.contains(id))
        .filter(|id| !has_without_attribute(by_id.get(id).copied(), faves, &opts.without))
        .collect();

    protect_reply_ancestors(&mut prune_ids, messages);

    let mut result: Vec<MessageId> = prune_ids.into_iter().collect();
    result.sort_by_key(|id| by_id.get(id).map(|m| m.ts).unwrap_or(0));
    result
}

/// `--without <class>` means messages bearing that attribute are never
/// pruned, independent of whether `--with` dropped its default protection.
fn has_without_attribute(message: Option<&Message>, faves: &[Fave], without: &HashSet<ProtectionClass>) -> bool {
    let Some(message) = message else {
        return false;
    };
    without.iter().any(|class| match class {
        ProtectionClass::Replies => message.reply_to.is_some(),
        ProtectionClass::Faves => faves
            .iter()
            .any(|f| f.item_type == FaveItemType::Message && f.item_guid == message.id.as_str()),
        ProtectionClass::Reacts => message.has_reactions(),
    })
}

/// Any message not slated for pruning is being kept; pull its `reply_to`
/// parent back out of the prune set too, and repeat to a fixpoint. This
/// closure runs again here (beyond the one inside `required_message_ids`)
/// because `keep_last`/`before`/`with_react` can add messages to the kept
/// side that `required_message_ids` never saw.
fn protect_reply_ancestors(prune_ids: &mut HashSet<MessageId>, messages: &[Message]) {
    loop {
        let mut changed = false;
        for message in messages {
            if prune_ids.contains(&message.id) {
                continue;
            }
            if let Some(parent) = &message.reply_to {
                if prune_ids.remove(parent) {
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// Runs a full prune of `home`: computes candidates, archives the pruned
/// range of the `room` stream into `history.jsonl`, rewrites the stream
/// with a single summary tombstone appended, and rebuilds the projection
/// from the result. All-or-nothing: if the guard refuses, nothing is written.
#[allow(clippy::too_many_arguments)]
pub fn prune(
    log: &EventLog,
    projection: &mut Projection,
    projection_path: &Path,
    clock: &dyn Clock,
    id_gen: &dyn IdGen,
    guard: &dyn PruneGuard,
    project_root: &Path,
    home: &str,
    opts: &PruneOptions,
) -> Result<PruneReport, EngineError> {
    guard.check(project_root).map_err(EngineError::GuardRefused)?;

    let events = log.read_all_sorted()?;
    let all_messages: Vec<Message> = fold_messages(&events).into_values().collect();
    let threads: Vec<Thread> = fold_threads(&events).into_values().collect();
    let questions: Vec<Question> = fold_questions(&events).into_values().collect();
    let faves = fold_faves(&events);
    let pins = fold_pins(&events);

    let home_messages: Vec<Message> = all_messages.into_iter().filter(|m| m.home == home).collect();
    let candidates = prune_candidates(&home_messages, &threads, &questions, &faves, &pins, opts);
    if candidates.is_empty() {
        return Ok(PruneReport::default());
    }

    let by_id: HashMap<&MessageId, &Message> = home_messages.iter().map(|m| (&m.id, m)).collect();
    let mut pruned: Vec<&Message> = candidates.iter().filter_map(|id| by_id.get(id).copied()).collect();
    pruned.sort_by_key(|m| m.ts);
    let (Some(first), Some(last)) = (pruned.first(), pruned.last()) else {
        return Ok(PruneReport::default());
    };

    let tombstone_id = MessageId::new(format!("msg-{}", id_gen.next()));
    let tombstone = Event::MessagePost {
        id: tombstone_id.clone(),
        from_agent: AgentId::new("system"),
        body: format!(
            "pruned: {} messages between @{}, @{} from #{} to #{}",
            candidates.len(),
            first.from_agent,
            last.from_agent,
            first.id.as_str(),
            last.id.as_str(),
        ),
        home: home.to_string(),
        reply_to: None,
        references: Vec::new(),
        mentions: Vec::new(),
        msg_type: MsgType::Tombstone,
        ts: clock.now_secs(),
    };

    let candidate_set: HashSet<MessageId> = candidates.into_iter().collect();
    log.archive_and_rewrite(
        "room",
        opts.all,
        |event| match message_target(event) {
            Some(id) => !candidate_set.contains(id),
            None => true,
        },
        &[tombstone.clone()],
    )?;

    let rebuilt = log.read_all_sorted()?;
    *projection = Projection::rebuild_from_log(projection_path, &rebuilt)?;

    Ok(PruneReport {
        pruned: candidate_set.len(),
        tombstone_id: Some(tombstone_id),
    })
}

/// The message id a per-message event targets, if any. Events with no such
/// target (agent/thread/wake/question/fave/etc.) always survive a rewrite.
fn message_target(event: &Event) -> Option<&MessageId> {
    match event {
        Event::MessagePost { id, .. }
        | Event::MessageEdit { id, .. }
        | Event::MessageReact { id, .. }
        | Event::MessageUnreact { id, .. }
        | Event::MessageMove { id, .. }
        | Event::MessageDelete { id, .. } => Some(id),
        Event::MessagePin { pin, .. } | Event::MessageUnpin { pin, .. } => match pin {
            Pin::Message { message, .. } => Some(message),
            Pin::Thread { .. } => None,
        },
        _ => None,
    }
}

/// Replays message-domain events into current `Message` rows. The SQLite
/// projection doesn't carry reactions, references, or edit history, so the
/// pruning engine folds messages straight off the log the same way the
/// daemon folds wake conditions off the log rather than the projection.
fn fold_messages(events: &[Event]) -> HashMap<MessageId, Message> {
    let mut table: HashMap<MessageId, Message> = HashMap::new();
    for event in events {
        match event {
            Event::MessagePost {
                id,
                from_agent,
                body,
                home,
                reply_to,
                references,
                mentions,
                msg_type,
                ts,
            } => {
                table.insert(
                    id.clone(),
                    Message {
                        id: id.clone(),
                        ts: *ts,
                        from_agent: from_agent.as_str().to_string(),
                        body: body.clone(),
                        home: home.clone(),
                        reply_to: reply_to.clone(),
                        references: references.clone(),
                        surface_message: None,
                        quote_message_guid: None,
                        mentions: mentions.clone(),
                        reactions: HashMap::new(),
                        archived_at: None,
                        edited_at: None,
                        edit_count: 0,
                        msg_type: *msg_type,
                    },
                );
            }
            Event::MessageEdit { id, body, at } => {
                if let Some(message) = table.get_mut(id) {
                    message.body = body.clone();
                    message.edited_at = Some(*at);
                    message.edit_count += 1;
                }
            }
            Event::MessageReact { id, agent_id, reaction, at } => {
                if let Some(message) = table.get_mut(id) {
                    message.reactions.entry(reaction.clone()).or_default().push(Reaction {
                        agent: agent_id.as_str().to_string(),
                        ts: *at,
                    });
                }
            }
            Event::MessageUnreact { id, agent_id, reaction, .. } => {
                if let Some(message) = table.get_mut(id) {
                    if let Some(reactors) = message.reactions.get_mut(reaction) {
                        reactors.retain(|r| r.agent != agent_id.as_str());
                    }
                }
            }
            Event::MessageMove { id, to_home, .. } => {
                if let Some(message) = table.get_mut(id) {
                    message.home = to_home.clone();
                }
            }
            Event::MessageDelete { id, tombstone_body, at } => {
                if let Some(message) = table.get_mut(id) {
                    message.body = tombstone_body.clone();
                    message.msg_type = MsgType::Tombstone;
                    message.archived_at = Some(*at);
                }
            }
            _ => {}
        }
    }
    table
}

fn fold_threads(events: &[Event]) -> HashMap<ThreadGuid, Thread> {
    let mut table: HashMap<ThreadGuid, Thread> = HashMap::new();
    for event in events {
        match event {
            Event::ThreadCreate { guid, name, parent_thread, thread_type, at } => {
                table.insert(
                    guid.clone(),
                    Thread {
                        guid: guid.clone(),
                        name: name.clone(),
                        parent_thread: parent_thread.clone(),
                        status: ThreadStatus::Open,
                        thread_type: *thread_type,
                        anchor_message_guid: None,
                        anchor_hidden: false,
                        last_activity_at: *at,
                    },
                );
            }
            Event::ThreadRename { guid, name, .. } => {
                if let Some(thread) = table.get_mut(guid) {
                    thread.name = name.clone();
                }
            }
            Event::ThreadSetStatus { guid, status, .. } => {
                if let Some(thread) = table.get_mut(guid) {
                    thread.status = *status;
                }
            }
            Event::ThreadSetAnchor { guid, anchor_message_guid, anchor_hidden, .. } => {
                if let Some(thread) = table.get_mut(guid) {
                    thread.anchor_message_guid = anchor_message_guid.clone();
                    thread.anchor_hidden = *anchor_hidden;
                }
            }
            _ => {}
        }
    }
    table
}

fn fold_questions(events: &[Event]) -> HashMap<QuestionGuid, Question> {
    let mut table: HashMap<QuestionGuid, Question> = HashMap::new();
    for event in events {
        match event {
            Event::QuestionAsked { guid, asked_by, asked_of, message_guid, asked_in } => {
                table.insert(
                    guid.clone(),
                    Question {
                        guid: guid.clone(),
                        asked_by: asked_by.as_str().to_string(),
                        asked_of: asked_of.as_str().to_string(),
                        message_guid: message_guid.clone(),
                        answer_message_guid: None,
                        status: QuestionStatus::Open,
                        asked_in: *asked_in,
                        answered_in: None,
                    },
                );
            }
            Event::QuestionAnswered { guid, answer_message_guid, answered_in } => {
                if let Some(question) = table.get_mut(guid) {
                    question.answer(answer_message_guid.clone(), *answered_in);
                }
            }
            _ => {}
        }
    }
    table
}

fn fold_faves(events: &[Event]) -> Vec<Fave> {
    let mut faves: Vec<Fave> = Vec::new();
    for event in events {
        match event {
            Event::FaveSet { agent_id, item_type, item_guid, .. } => {
                let fave = Fave {
                    agent: agent_id.as_str().to_string(),
                    item_type: *item_type,
                    item_guid: item_guid.clone(),
                };
                if !faves.contains(&fave) {
                    faves.push(fave);
                }
            }
            Event::FaveUnset { agent_id, item_type, item_guid, .. } => {
                faves.retain(|f| {
                    !(f.agent == agent_id.as_str() && f.item_type == *item_type && f.item_guid == *item_guid)
                });
            }
            _ => {}
        }
    }
    faves
}

fn fold_pins(events: &[Event]) -> Vec<Pin> {
    let mut pins: Vec<Pin> = Vec::new();
    for event in events {
        match event {
            Event::MessagePin { pin, .. } => {
                if !pins.contains(pin) {
                    pins.push(pin.clone());
                }
            }
            Event::MessageUnpin { pin, .. } => {
                pins.retain(|p| p != pin);
            }
            _ => {}
        }
    }
    pins
}

#[cfg(test)]
#[path = "pruning_tests.rs"]
mod tests;
