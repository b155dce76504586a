use super::*;

#[test]
fn mute_without_expiry_is_always_active() {
    let mute = Mute {
        thread: ThreadGuid::new("thrd-1"),
        agent: "alice".to_string(),
        expires_at: None,
    };
    assert!(mute.is_active(1_000_000));
}

#[test]
fn mute_expires() {
    let mute = Mute {
        thread: ThreadGuid::new("thrd-1"),
        agent: "alice".to_string(),
        expires_at: Some(100),
    };
    assert!(mute.is_active(50));
    assert!(!mute.is_active(100));
    assert!(!mute.is_active(200));
}
