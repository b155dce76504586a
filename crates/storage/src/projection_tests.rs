use super::*;
use agentbus_core::{AgentId, MessageId, MsgType, ThreadGuid, ThreadType};

fn register(agent: &str, at: u64) -> Event {
    Event::AgentRegister {
        agent_id: AgentId::new(agent),
        purpose: None,
        avatar: None,
        managed: true,
        at,
    }
}

fn post(id: &str, from: &str, home: &str, ts: u64) -> Event {
    Event::MessagePost {
        id: MessageId::new(id),
        from_agent: AgentId::new(from),
        body: "hello".to_string(),
        home: home.to_string(),
        reply_to: None,
        references: vec![],
        mentions: vec![],
        msg_type: MsgType::Agent,
        ts,
    }
}

#[test]
fn in_memory_projection_starts_with_schema_applied() {
    let p = Projection::open_in_memory().unwrap();
    let version: i64 = p
        .conn()
        .query_row("SELECT version FROM schema_meta", [], |r| r.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[test]
fn applying_agent_register_then_heartbeat_updates_last_seen() {
    let mut p = Projection::open_in_memory().unwrap();
    p.apply(&register("alice", 10)).unwrap();
    p.apply(&Event::AgentHeartbeat {
        agent_id: AgentId::new("alice"),
        at: 20,
    })
    .unwrap();

    let last_seen: i64 = p
        .conn()
        .query_row(
            "SELECT last_seen FROM agents WHERE agent_id = 'alice'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(last_seen, 20);
}

#[test]
fn message_post_is_idempotent_on_replay() {
    let mut p = Projection::open_in_memory().unwrap();
    let ev = post("msg-1", "alice", "room", 5);
    p.apply(&ev).unwrap();
    p.apply(&ev).unwrap();

    let count: i64 = p
        .conn()
        .query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn watermark_advance_rejects_going_backwards() {
    let mut p = Projection::open_in_memory().unwrap();
    p.apply(&Event::WatermarkAdvance {
        agent_id: AgentId::new("alice"),
        home: "room".to_string(),
        message_guid: MessageId::new("msg-b"),
        message_ts: 100,
    })
    .unwrap();
    p.apply(&Event::WatermarkAdvance {
        agent_id: AgentId::new("alice"),
        home: "room".to_string(),
        message_guid: MessageId::new("msg-a"),
        message_ts: 50,
    })
    .unwrap();

    let ts: i64 = p
        .conn()
        .query_row(
            "SELECT message_ts FROM watermarks WHERE agent_id = 'alice' AND home = 'room'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(ts, 100);
}

#[test]
fn question_answered_is_idempotent() {
    let mut p = Projection::open_in_memory().unwrap();
    p.apply(&Event::QuestionAsked {
        guid: agentbus_core::QuestionGuid::new("q-1"),
        asked_by: AgentId::new("alice"),
        asked_of: AgentId::new("bob"),
        message_guid: MessageId::new("msg-1"),
        asked_in: 1,
    })
    .unwrap();
    let answer = Event::QuestionAnswered {
        guid: agentbus_core::QuestionGuid::new("q-1"),
        answer_message_guid: MessageId::new("msg-2"),
        answered_in: 2,
    };
    p.apply(&answer).unwrap();
    p.apply(&Event::QuestionAnswered {
        guid: agentbus_core::QuestionGuid::new("q-1"),
        answer_message_guid: MessageId::new("msg-3"),
        answered_in: 3,
    })
    .unwrap();

    let answer_guid: String = p
        .conn()
        .query_row(
            "SELECT answer_message_guid FROM questions WHERE guid = 'q-1'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(answer_guid, "msg-2");
}

#[test]
fn rebuild_from_log_replays_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("projection.sqlite3");
    let events = vec![
        register("alice", 1),
        Event::ThreadCreate {
            guid: ThreadGuid::new("thrd-1"),
            name: "design".to_string(),
            parent_thread: None,
            thread_type: ThreadType::Default,
            at: 2,
        },
        post("msg-1", "alice", "thrd-1", 3),
    ];
    let p = Projection::rebuild_from_log(&db_path, &events).unwrap();

    let count: i64 = p
        .conn()
        .query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
