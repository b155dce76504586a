use super::*;

fn timer_wake() -> WakeCondition {
    WakeCondition {
        id: WakeId::new("wake-1"),
        agent: "alice".to_string(),
        wake_type: WakeType::Timer,
        persistence: WakePersistence::OneShot,
        home: None,
        pattern: None,
        fire_at: Some(100),
        on_agents: vec![],
        created_at: 0,
        paused: false,
        last_fired_at: None,
    }
}

#[test]
fn fresh_condition_is_armed_and_not_spent() {
    let w = timer_wake();
    assert!(w.is_armed());
    assert!(!w.is_spent());
}

#[test]
fn one_shot_pauses_itself_after_firing() {
    let mut w = timer_wake();
    w.mark_fired(100);
    assert!(w.is_spent());
    assert!(!w.is_armed());
    assert_eq!(w.last_fired_at, Some(100));
}

#[test]
fn recurring_stays_armed_after_firing() {
    let mut w = timer_wake();
    w.persistence = WakePersistence::Recurring;
    w.mark_fired(100);
    assert!(w.is_armed());
    assert!(!w.is_spent());
}
