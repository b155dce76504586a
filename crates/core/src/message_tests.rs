use super::*;

fn base_message() -> Message {
    Message {
        id: MessageId::new("msg-1"),
        ts: 100,
        from_agent: "alice".to_string(),
        body: "hello".to_string(),
        home: ROOM.to_string(),
        reply_to: None,
        references: Vec::new(),
        surface_message: None,
        quote_message_guid: None,
        mentions: Vec::new(),
        reactions: HashMap::new(),
        archived_at: None,
        edited_at: None,
        edit_count: 0,
        msg_type: MsgType::Agent,
    }
}

#[test]
fn room_sentinel_detected() {
    let msg = base_message();
    assert!(msg.is_in_room());
}

#[test]
fn tombstones_are_not_repliable() {
    let mut msg = base_message();
    msg.msg_type = MsgType::Tombstone;
    assert!(msg.is_tombstone());
    assert!(!msg.is_repliable());
}

#[test]
fn has_reactions_checks_nonempty_lists() {
    let mut msg = base_message();
    assert!(!msg.has_reactions());
    msg.reactions.insert("empty".to_string(), Vec::new());
    assert!(!msg.has_reactions());
    msg.reactions.insert(
        ":+1:".to_string(),
        vec![Reaction {
            agent: "bob".to_string(),
            ts: 1,
        }],
    );
    assert!(msg.has_reactions());
}

#[test]
fn archived_freezes_state() {
    let mut msg = base_message();
    assert!(!msg.is_archived());
    msg.archived_at = Some(200);
    assert!(msg.is_archived());
}
