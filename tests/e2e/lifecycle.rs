//! Lifecycle of a single mock instance: lock, wait, exit paths.

use super::common::{read_pid, MockProcess};
use std::fs;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[test]
fn test_timeout_exit_holds_lock_then_removes_it() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let mut mock = MockProcess::spawn(&lock_path, &["--timeout", "2"], None);
    let ready = mock.wait_ready();
    let ready_at = Instant::now();

    assert!(ready.contains(&format!("with PID: {}", mock.pid())));
    assert_eq!(read_pid(&lock_path), mock.pid());

    thread::sleep(Duration::from_millis(1800));
    assert!(lock_path.exists(), "lock must be held for the whole wait");
    assert_eq!(read_pid(&lock_path), mock.pid());

    let (status, stdout, _) = mock.wait_exit(Duration::from_secs(10));

    assert!(status.success());
    // The wait starts right after the announcement; allow for read latency
    assert!(ready_at.elapsed() >= Duration::from_millis(1900));
    assert!(!lock_path.exists());
    assert!(stdout.contains("Timeout elapsed. Lock file removed. Exiting..."));
}

#[test]
fn test_sigterm_exits_zero_and_removes_lock() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let mut mock = MockProcess::spawn(&lock_path, &["--timeout", "30"], None);
    mock.wait_ready();
    assert_eq!(read_pid(&lock_path), mock.pid());

    let signalled = Instant::now();
    mock.terminate();
    let (status, stdout, _) = mock.wait_exit(Duration::from_secs(5));

    assert_eq!(status.code(), Some(0));
    assert!(signalled.elapsed() < Duration::from_secs(5));
    assert!(!lock_path.exists());
    assert!(stdout.contains("Lock file removed. Exiting..."));
}

#[test]
fn test_existing_lock_fails_and_is_left_alone() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");
    fs::write(&lock_path, "4242\n").unwrap();

    let mut mock = MockProcess::spawn(&lock_path, &["--timeout", "1"], None);
    let (status, stdout, stderr) = mock.wait_exit(Duration::from_secs(5));

    assert!(!status.success());
    assert_eq!(status.code(), Some(1));
    assert!(stderr.contains("already exists"), "stderr: {stderr}");
    assert!(!stdout.contains("Lock file created"));
    assert_eq!(fs::read_to_string(&lock_path).unwrap(), "4242\n");
}

#[test]
fn test_second_instance_cannot_take_held_lock() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let mut first = MockProcess::spawn(&lock_path, &["--timeout", "30"], None);
    first.wait_ready();

    let mut second = MockProcess::spawn(&lock_path, &["--timeout", "1"], None);
    let (status, _, _) = second.wait_exit(Duration::from_secs(5));
    assert!(!status.success());
    assert_eq!(read_pid(&lock_path), first.pid());

    first.terminate();
    let (status, _, _) = first.wait_exit(Duration::from_secs(5));
    assert!(status.success());
    assert!(!lock_path.exists());
}

#[test]
fn test_cookie_on_stdin_is_acknowledged() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let mut mock = MockProcess::spawn(
        &lock_path,
        &["--cookie-on-stdin", "--timeout", "0"],
        Some("abc123\n"),
    );
    let (status, _, stderr) = mock.wait_exit(Duration::from_secs(5));

    assert!(status.success());
    assert!(stderr.lines().any(|line| line == "Received: abc123"), "stderr: {stderr}");
    assert!(!lock_path.exists());
}

#[test]
fn test_cookie_flag_without_input_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let mut mock = MockProcess::spawn(&lock_path, &["-c", "-t", "0"], None);
    let (status, _, stderr) = mock.wait_exit(Duration::from_secs(5));

    assert!(status.success());
    assert!(!stderr.contains("Received"));
}

#[test]
fn test_unknown_flags_and_bad_timeout_are_tolerated() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let started = Instant::now();
    let mut mock = MockProcess::spawn(
        &lock_path,
        &["--fix-openssl", "connect", "--timeout", "soon"],
        None,
    );
    let (status, stdout, _) = mock.wait_exit(Duration::from_secs(5));

    assert!(status.success());
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(stdout.contains("Waiting 0 seconds before exiting"));
    assert!(!lock_path.exists());
}
