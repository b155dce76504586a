use super::*;

#[test]
fn validate_accepts_kebab_case_names() {
    assert!(validate_thread_name("bd-42").is_ok());
    assert!(validate_thread_name("notes").is_ok());
}

#[test]
fn validate_rejects_uppercase_underscores_spaces() {
    assert!(validate_thread_name("BD-42").is_err());
    assert!(validate_thread_name("bd_42").is_err());
    assert!(validate_thread_name("bd 42").is_err());
    assert!(validate_thread_name("-leading-dash").is_err());
}

#[test]
fn sanitize_lowercases_and_replaces_separators() {
    assert_eq!(sanitize_thread_name("My Notes_v2"), "my-notes-v2");
}

#[test]
fn sanitized_output_is_itself_valid() {
    let sanitized = sanitize_thread_name("Design Review");
    assert!(validate_thread_name(&sanitized).is_ok());
}

#[test]
fn reserved_meta_paths_are_detected() {
    assert!(Thread::is_reserved_path("meta/opus/notes"));
    assert!(!Thread::is_reserved_path("general/notes"));
}
