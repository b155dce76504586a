use super::*;
use tempfile::tempdir;

#[test]
fn acquire_creates_parent_dir_and_writes_pid() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("nested/daemon.pid");

    let lock = DaemonLock::acquire(&lock_path).unwrap();
    assert_eq!(
        DaemonLock::read_holder_pid(&lock_path),
        Some(std::process::id())
    );
    drop(lock);

    assert!(!lock_path.exists());
}

#[test]
fn second_acquire_fails_while_first_is_held() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("daemon.pid");

    let _first = DaemonLock::acquire(&lock_path).unwrap();
    let second = DaemonLock::acquire(&lock_path);
    assert!(second.is_err());
}

#[test]
fn lock_can_be_reacquired_after_release() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("daemon.pid");

    let first = DaemonLock::acquire(&lock_path).unwrap();
    drop(first);

    let second = DaemonLock::acquire(&lock_path);
    assert!(second.is_ok());
}

#[test]
fn force_acquire_with_no_existing_holder_succeeds_immediately() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("daemon.pid");

    let lock = DaemonLock::force_acquire(&lock_path);
    assert!(lock.is_ok());
}
