use super::*;
use agentbus_core::{FakeClock, UlidIdGen};
use tempfile::tempdir;

fn harness() -> (EventLog, Projection, FakeClock, UlidIdGen, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let log = EventLog::open(dir.path()).unwrap();
    let projection = Projection::open_in_memory().unwrap();
    (log, projection, FakeClock::new(1000), UlidIdGen, dir)
}

#[test]
fn create_thread_sanitizes_the_name() {
    let (log, mut projection, clock, id_gen, _dir) = harness();
    let guid = create_thread(
        &log,
        &mut projection,
        &clock,
        &id_gen,
        "Design Review",
        None,
        ThreadType::Default,
    )
    .unwrap();

    let name: String = projection
        .conn()
        .query_row(
            "SELECT name FROM threads WHERE guid = ?1",
            [guid.as_str()],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(name, "design-review");
}

#[test]
fn set_thread_status_archives() {
    let (log, mut projection, clock, id_gen, _dir) = harness();
    let guid = create_thread(
        &log,
        &mut projection,
        &clock,
        &id_gen,
        "design-review",
        None,
        ThreadType::Default,
    )
    .unwrap();

    set_thread_status(&log, &mut projection, &clock, &guid, ThreadStatus::Archived).unwrap();

    let status: String = projection
        .conn()
        .query_row(
            "SELECT status FROM threads WHERE guid = ?1",
            [guid.as_str()],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "archived");
}

#[test]
fn rename_thread_rejects_invalid_names() {
    let (log, mut projection, clock, id_gen, _dir) = harness();
    let guid = create_thread(
        &log,
        &mut projection,
        &clock,
        &id_gen,
        "design-review",
        None,
        ThreadType::Default,
    )
    .unwrap();

    let result = rename_thread(&log, &mut projection, &clock, &guid, "___");
    assert!(result.is_err());
}
