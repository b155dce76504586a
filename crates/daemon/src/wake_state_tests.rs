use super::*;
use agentbus_core::{AgentId, WakePersistence, WakeType};

fn set_event(id: &str, at: u64) -> Event {
    Event::WakeSet {
        id: WakeId::new(id),
        agent_id: AgentId::new("opus"),
        wake_type: WakeType::Timer,
        persistence: WakePersistence::OneShot,
        home: None,
        pattern: None,
        fire_at: Some(at + 10),
        on_agents: vec![],
        at,
    }
}

#[test]
fn set_then_fire_marks_condition_spent() {
    let events = vec![
        set_event("wake-1", 0),
        Event::WakeFire {
            id: WakeId::new("wake-1"),
            at: 10,
        },
    ];
    let conditions = fold(&events);
    assert_eq!(conditions.len(), 1);
    assert!(conditions[0].is_spent());
}

#[test]
fn clear_removes_the_condition() {
    let events = vec![
        set_event("wake-1", 0),
        Event::WakeClear {
            id: WakeId::new("wake-1"),
            at: 5,
        },
    ];
    assert!(fold(&events).is_empty());
}

#[test]
fn pause_disarms_without_removing() {
    let events = vec![
        set_event("wake-1", 0),
        Event::WakePause {
            id: WakeId::new("wake-1"),
            at: 5,
        },
    ];
    let conditions = fold(&events);
    assert_eq!(conditions.len(), 1);
    assert!(!conditions[0].is_armed());
}
