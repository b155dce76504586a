use super::*;

#[test]
fn presence_event_round_trips_through_json() {
    let ev = PresenceEvent {
        agent: "alice".to_string(),
        from: Presence::Active,
        to: Presence::Idle,
        at: 100,
        reason: None,
    };
    let json = serde_json::to_string(&ev).unwrap();
    let back: PresenceEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(ev, back);
}

#[test]
fn trigger_kind_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&TriggerKind::Mention).unwrap(),
        "\"mention\""
    );
}
