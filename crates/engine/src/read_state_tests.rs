use super::*;
use agentbus_core::FakeClock;
use tempfile::tempdir;

fn harness() -> (EventLog, Projection, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let log = EventLog::open(dir.path()).unwrap();
    let projection = Projection::open_in_memory().unwrap();
    (log, projection, dir)
}

#[test]
fn first_advance_always_succeeds() {
    let (log, mut projection, _dir) = harness();
    let advanced = advance_watermark(
        &log,
        &mut projection,
        &AgentId::new("alice"),
        "room",
        &MessageId::new("msg-a"),
        10,
    )
    .unwrap();
    assert!(advanced);
}

#[test]
fn regression_is_a_silent_no_op() {
    let (log, mut projection, _dir) = harness();
    advance_watermark(
        &log,
        &mut projection,
        &AgentId::new("alice"),
        "room",
        &MessageId::new("msg-b"),
        100,
    )
    .unwrap();

    let advanced = advance_watermark(
        &log,
        &mut projection,
        &AgentId::new("alice"),
        "room",
        &MessageId::new("msg-a"),
        50,
    )
    .unwrap();
    assert!(!advanced);

    let ts: i64 = projection
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
fn ghost_cursor_set_then_ack_appends_both_events() {
    let (log, _projection, _dir) = harness();
    let clock = FakeClock::new(5000);
    set_ghost_cursor(
        &log,
        &AgentId::new("alice"),
        "room",
        &MessageId::new("msg-z"),
        true,
        &clock,
    )
    .unwrap();
    ack_ghost_cursor(&log, &AgentId::new("alice"), "room", &clock).unwrap();

    let events = log.read_stream("room").unwrap();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], Event::GhostCursorSet { .. }));
    assert!(matches!(events[1], Event::GhostCursorAck { .. }));
}
