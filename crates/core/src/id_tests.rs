use super::*;

crate::define_id! {
    pub struct TestId;
}

#[test]
fn ulid_ids_are_unique_and_sortable() {
    let gen = UlidIdGen;
    let a = gen.next();
    let b = gen.next();
    assert_ne!(a, b);
    assert_eq!(a.len(), 26);
}

#[test]
fn prefixed_adds_the_prefix() {
    let gen = UlidIdGen;
    let id = prefixed("msg", &gen);
    assert!(id.starts_with("msg-"));
}

#[test]
fn short_truncates() {
    let id = TestId::new("abcdefgh");
    assert_eq!(id.short(4), "abcd");
    assert_eq!(id.short(100), "abcdefgh");
}

#[test]
fn short_str_truncates() {
    let s = "abcdefgh";
    assert_eq!(ShortId::short(s, 3), "abc");
}
