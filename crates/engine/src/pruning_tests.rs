use super::*;
use agentbus_core::{FakeClock, MsgType, UlidIdGen};
use std::collections::HashMap;
use tempfile::tempdir;

fn message(id: &str, ts: u64, reply_to: Option<&str>) -> Message {
    Message {
        id: MessageId::new(id),
        ts,
        from_agent: "alice".to_string(),
        body: "hi".to_string(),
        home: "room".to_string(),
        reply_to: reply_to.map(MessageId::new),
        references: vec![],
        surface_message: None,
        quote_message_guid: None,
        mentions: vec![],
        reactions: HashMap::new(),
        archived_at: None,
        edited_at: None,
        edit_count: 0,
        msg_type: MsgType::Agent,
    }
}

fn reacted(mut m: Message, reaction: &str, agent: &str) -> Message {
    m.reactions.entry(reaction.to_string()).or_default().push(Reaction {
        agent: agent.to_string(),
        ts: m.ts,
    });
    m
}

fn harness() -> (EventLog, Projection, std::path::PathBuf, FakeClock, UlidIdGen, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let log = EventLog::open(dir.path()).unwrap();
    let projection_path = dir.path().join("projection.sqlite");
    let projection = Projection::open(&projection_path).unwrap();
    (log, projection, projection_path, FakeClock::new(1000), UlidIdGen, dir)
}

#[test]
fn reply_and_reaction_bearing_messages_are_required_by_default() {
    let messages = vec![message("msg-1", 0, None), reacted(message("msg-2", 1, None), ":+1:", "bob")];
    let required = required_message_ids(&messages, &[], &[], &[], &[], &HashSet::new());
    assert!(required.contains(&MessageId::new("msg-2")));
}

#[test]
fn with_replies_drops_reply_protection() {
    let messages = vec![message("msg-1", 0, None), message("msg-2", 1, Some("msg-1"))];
    let mut with = HashSet::new();
    with.insert(ProtectionClass::Replies);
    let required = required_message_ids(&messages, &[], &[], &[], &[], &with);
    assert!(!required.contains(&MessageId::new("msg-2")));
}

#[test]
fn reply_chain_closure_pulls_in_parents_of_required_messages() {
    let messages = vec![message("msg-1", 0, None), message("msg-2", 1, Some("msg-1"))];
    let required = required_message_ids(&messages, &[], &[], &[], &[], &HashSet::new());
    assert!(required.contains(&MessageId::new("msg-1")));
    assert!(required.contains(&MessageId::new("msg-2")));
}

#[test]
fn anchor_pinned_and_question_messages_are_required() {
    let messages = vec![
        message("msg-1", 0, None),
        message("msg-2", 1, None),
        message("msg-3", 2, None),
        message("msg-4", 3, None),
    ];
    let threads = vec![Thread {
        guid: ThreadGuid::new("thrd-1"),
        name: "design".to_string(),
        parent_thread: None,
        status: ThreadStatus::Open,
        thread_type: agentbus_core::ThreadType::Default,
        anchor_message_guid: Some(MessageId::new("msg-1")),
        anchor_hidden: false,
        last_activity_at: 0,
    }];
    let pins = vec![Pin::Message {
        message: MessageId::new("msg-2"),
        thread: ThreadGuid::new("thrd-1"),
    }];
    let questions = vec![Question {
        guid: QuestionGuid::new("q-1"),
        asked_by: "alice".to_string(),
        asked_of: "bob".to_string(),
        message_guid: MessageId::new("msg-3"),
        answer_message_guid: Some(MessageId::new("msg-4")),
        status: QuestionStatus::Answered,
        asked_in: 0,
        answered_in: Some(1),
    }];
    let required = required_message_ids(&messages, &threads, &questions, &[], &pins, &HashSet::new());
    assert!(required.contains(&MessageId::new("msg-1")));
    assert!(required.contains(&MessageId::new("msg-2")));
    assert!(required.contains(&MessageId::new("msg-3")));
    assert!(required.contains(&MessageId::new("msg-4")));
}

#[test]
fn keep_last_protects_pinned_messages_and_their_reply_chain() {
    // ten messages, msg-5 has reply msg-6, msg-7 is pinned.
    let mut messages: Vec<Message> = (1..=10).map(|n| message(&format!("msg-{n}"), n, None)).collect();
    messages[5] = message("msg-6", 6, Some("msg-5"));
    let pins = vec![Pin::Message {
        message: MessageId::new("msg-7"),
        thread: ThreadGuid::new("thrd-1"),
    }];
    let opts = PruneOptions {
        keep_last: Some(3),
        ..Default::default()
    };
    let candidates = prune_candidates(&messages, &[], &[], &[], &pins, &opts);
    let kept: Vec<String> = messages
        .iter()
        .map(|m| m.id.as_str().to_string())
        .filter(|id| !candidates.iter().any(|c| c.as_str() == id))
        .collect();
    for id in ["msg-8", "msg-9", "msg-10", "msg-7", "msg-5", "msg-6"] {
        assert!(kept.contains(&id.to_string()), "expected {id} to survive, kept={kept:?}");
    }
    assert_eq!(candidates.len(), 4);
}

#[test]
fn with_react_selects_reacted_messages_and_overrides_reacts_protection() {
    let messages = vec![
        message("msg-a", 1, None),
        reacted(message("msg-b", 2, None), ":filed:", "bob"),
        message("msg-c", 3, None),
    ];
    let opts = PruneOptions {
        with_react: Some(":filed:".to_string()),
        ..Default::default()
    };
    let candidates = prune_candidates(&messages, &[], &[], &[], &[], &opts);
    assert_eq!(candidates, vec![MessageId::new("msg-b")]);
}

#[test]
fn without_reacts_reasserts_protection_that_with_dropped() {
    let messages = vec![
        message("msg-1", 1, None),
        reacted(message("msg-2", 2, None), ":eyes:", "bob"),
        message("msg-3", 3, None),
    ];
    let mut with = HashSet::new();
    with.insert(ProtectionClass::Reacts);
    let mut without = HashSet::new();
    without.insert(ProtectionClass::Reacts);
    let opts = PruneOptions {
        keep_last: Some(0),
        with,
        without,
        ..Default::default()
    };
    let candidates = prune_candidates(&messages, &[], &[], &[], &[], &opts);
    assert!(candidates.iter().any(|c| c.as_str() == "msg-1"));
    assert!(!candidates.iter().any(|c| c.as_str() == "msg-2"));
}

#[test]
fn prune_refuses_when_guard_rejects() {
    struct AlwaysRefuse;
    impl PruneGuard for AlwaysRefuse {
        fn check(&self, _project_root: &std::path::Path) -> Result<(), String> {
            Err("dirty tree".to_string())
        }
    }
    let (log, mut projection, projection_path, clock, id_gen, dir) = harness();
    let result = prune(
        &log,
        &mut projection,
        &projection_path,
        &clock,
        &id_gen,
        &AlwaysRefuse,
        dir.path(),
        "room",
        &PruneOptions::default(),
    );
    assert!(result.is_err());
    assert!(log.read_stream("room").unwrap().is_empty());
}

#[test]
fn prune_writes_single_tombstone_and_archives_to_history() {
    let (log, mut projection, projection_path, clock, id_gen, dir) = harness();
    for n in 1..=5u64 {
        log.append(&Event::MessagePost {
            id: MessageId::new(format!("msg-{n}")),
            from_agent: AgentId::new("alice"),
            body: "hi".to_string(),
            home: "room".to_string(),
            reply_to: None,
            references: vec![],
            mentions: vec![],
            msg_type: MsgType::Agent,
            ts: n,
        })
        .unwrap();
    }

    let opts = PruneOptions {
        keep_last: Some(2),
        ..Default::default()
    };
    let report = prune(
        &log,
        &mut projection,
        &projection_path,
        &clock,
        &id_gen,
        &NoopGuard,
        dir.path(),
        "room",
        &opts,
    )
    .unwrap();

    assert_eq!(report.pruned, 3);
    assert!(report.tombstone_id.is_some());

    let remaining = log.read_stream("room").unwrap();
    let tombstones = remaining
        .iter()
        .filter(|e| matches!(e, Event::MessagePost { msg_type: MsgType::Tombstone, .. }))
        .count();
    assert_eq!(tombstones, 1);
    // msg-4, msg-5 kept plus the synthesized tombstone.
    assert_eq!(remaining.len(), 3);

    let history = std::fs::read_to_string(dir.path().join("history.jsonl")).unwrap();
    assert!(history.contains("msg-1"));
    assert!(history.contains("msg-2"));
    assert!(history.contains("msg-3"));
}

#[test]
fn prune_is_a_noop_when_nothing_is_prunable() {
    let (log, mut projection, projection_path, clock, id_gen, dir) = harness();
    log.append(&Event::MessagePost {
        id: MessageId::new("msg-1"),
        from_agent: AgentId::new("alice"),
        body: "hi".to_string(),
        home: "room".to_string(),
        reply_to: None,
        references: vec![],
        mentions: vec![],
        msg_type: MsgType::Agent,
        ts: 1,
    })
    .unwrap();

    let report = prune(
        &log,
        &mut projection,
        &projection_path,
        &clock,
        &id_gen,
        &NoopGuard,
        dir.path(),
        "room",
        &PruneOptions::default(),
    )
    .unwrap();

    assert_eq!(report, PruneReport::default());
    assert_eq!(log.read_stream("room").unwrap().len(), 1);
}
