use super::*;
use agentbus_core::{AgentId, MessageId, MsgType, WakeId};

fn pattern_wake(home: &str, pattern: &str) -> WakeCondition {
    WakeCondition {
        id: WakeId::new("wake-1"),
        agent: "alice".to_string(),
        wake_type: WakeType::Pattern,
        persistence: WakePersistence::Recurring,
        home: Some(home.to_string()),
        pattern: Some(pattern.to_string()),
        fire_at: None,
        on_agents: vec![],
        created_at: 0,
        paused: false,
        last_fired_at: None,
    }
}

fn mention_wake(home: &str, on_agents: &[&str]) -> WakeCondition {
    WakeCondition {
        id: WakeId::new("wake-mention"),
        agent: "alice".to_string(),
        wake_type: WakeType::NextMessage,
        persistence: WakePersistence::OneShot,
        home: Some(home.to_string()),
        pattern: None,
        fire_at: None,
        on_agents: on_agents.iter().map(|a| a.to_string()).collect(),
        created_at: 0,
        paused: false,
        last_fired_at: None,
    }
}

fn message_event(home: &str, body: &str) -> Event {
    message_event_from(home, body, "bob")
}

fn message_event_from(home: &str, body: &str, from_agent: &str) -> Event {
    Event::MessagePost {
        id: MessageId::new("msg-1"),
        from_agent: AgentId::new(from_agent),
        body: body.to_string(),
        home: home.to_string(),
        reply_to: None,
        references: vec![],
        mentions: vec![],
        msg_type: MsgType::Agent,
        ts: 1,
    }
}

#[test]
fn pattern_wake_fires_on_matching_body_in_its_home() {
    let w = pattern_wake("room", r"urgent");
    let fired = conditions_fired_by(&[w], &message_event("room", "this is urgent"));
    assert_eq!(fired.len(), 1);
}

#[test]
fn pattern_wake_ignores_other_homes() {
    let w = pattern_wake("room", r"urgent");
    let fired = conditions_fired_by(&[w], &message_event("thrd-1", "urgent"));
    assert!(fired.is_empty());
}

#[test]
fn paused_condition_never_fires() {
    let mut w = pattern_wake("room", r"urgent");
    w.paused = true;
    let fired = conditions_fired_by(&[w], &message_event("room", "urgent"));
    assert!(fired.is_empty());
}

#[test]
fn spent_one_shot_never_fires_again() {
    let mut w = pattern_wake("room", r"urgent");
    w.persistence = WakePersistence::OneShot;
    w.mark_fired(5);
    let fired = conditions_fired_by(&[w], &message_event("room", "urgent"));
    assert!(fired.is_empty());
}

#[test]
fn timer_due_when_fire_at_has_passed() {
    let w = WakeCondition {
        id: WakeId::new("wake-2"),
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
    };
    assert!(timers_due(&[w.clone()], 100).len() == 1);
    assert!(timers_due(&[w], 50).is_empty());
}

#[test]
fn on_mention_fires_only_for_listed_authors() {
    let w = mention_wake("room", &["bob"]);
    let fired = conditions_fired_by(&[w], &message_event_from("room", "hi", "bob"));
    assert_eq!(fired.len(), 1);
}

#[test]
fn on_mention_ignores_other_authors() {
    let w = mention_wake("room", &["bob"]);
    let fired = conditions_fired_by(&[w], &message_event_from("room", "hi", "carol"));
    assert!(fired.is_empty());
}
