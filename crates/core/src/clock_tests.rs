use super::*;

#[test]
fn fake_clock_advances_deterministically() {
    let clock = FakeClock::new(1_000);
    assert_eq!(clock.now_ms(), 1_000);
    assert_eq!(clock.now_secs(), 1);

    clock.advance_secs(30);
    assert_eq!(clock.now_ms(), 31_000);
    assert_eq!(clock.now_secs(), 31);
}

#[test]
fn system_clock_is_monotonic_nondecreasing() {
    let clock = SystemClock;
    let a = clock.now_ms();
    let b = clock.now_ms();
    assert!(b >= a);
}
