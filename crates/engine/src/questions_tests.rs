use super::*;
use agentbus_core::{FakeClock, UlidIdGen};
use tempfile::tempdir;

#[test]
fn ask_then_answer_closes_the_question_in_the_projection() {
    let dir = tempdir().unwrap();
    let log = EventLog::open(dir.path()).unwrap();
    let mut projection = Projection::open_in_memory().unwrap();
    let clock = FakeClock::new(1000);
    let id_gen = UlidIdGen;

    let guid = ask_question(
        &log,
        &mut projection,
        &clock,
        &id_gen,
        &AgentId::new("alice"),
        &AgentId::new("bob"),
        &MessageId::new("msg-1"),
    )
    .unwrap();

    answer_question(&log, &mut projection, &clock, &guid, &MessageId::new("msg-2")).unwrap();

    let status: String = projection
        .conn()
        .query_row(
            "SELECT status FROM questions WHERE guid = ?1",
            [guid.as_str()],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "answered");
}
