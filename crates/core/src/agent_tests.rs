use super::*;

#[test]
fn base_strips_numeric_clone_suffix() {
    let id = AgentId::new("alice.2");
    assert_eq!(id.base(), "alice");
    assert_eq!(id.split_clone_suffix(), ("alice", Some(2)));
}

#[test]
fn base_is_identity_without_suffix() {
    let id = AgentId::new("alice");
    assert_eq!(id.base(), "alice");
    assert_eq!(id.split_clone_suffix(), ("alice", None));
}

#[test]
fn non_numeric_suffix_is_not_a_clone_marker() {
    let id = AgentId::new("dev-rel.staging");
    assert_eq!(id.base(), "dev-rel.staging");
}

#[test]
fn validate_accepts_kebab_case() {
    assert!(AgentId::new("dev-rel").validate().is_ok());
    assert!(AgentId::new("alice2").validate().is_ok());
}

#[test]
fn validate_rejects_uppercase_and_leading_digit() {
    assert!(AgentId::new("Alice").validate().is_err());
    assert!(AgentId::new("2alice").validate().is_err());
    assert!(AgentId::new("alice_bob").validate().is_err());
}

#[test]
fn presence_legal_transitions() {
    assert!(Presence::Offline.can_transition_to(Presence::Spawning));
    assert!(Presence::Spawning.can_transition_to(Presence::Active));
    assert!(Presence::Active.can_transition_to(Presence::Brb));
    assert!(Presence::Brb.can_transition_to(Presence::Active));
    assert!(!Presence::Offline.can_transition_to(Presence::Active));
    assert!(!Presence::Idle.can_transition_to(Presence::Brb));
}
