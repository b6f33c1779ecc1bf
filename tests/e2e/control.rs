//! `--status` and `--stop` against a running instance.

use super::common::{mock_command, MockProcess};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_status_reports_inactive_without_instance() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let output = mock_command(&lock_path).arg("--status").output().unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Inactive"));
}

#[test]
fn test_status_and_stop_against_running_instance() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let mut mock = MockProcess::spawn(&lock_path, &["--timeout", "30"], None);
    mock.wait_ready();

    let output = mock_command(&lock_path).arg("--status").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains(&format!("Active (PID {})", mock.pid())));

    let output = mock_command(&lock_path).arg("--stop").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains(&format!("Sent SIGTERM to PID {}", mock.pid())));

    let (status, _, _) = mock.wait_exit(Duration::from_secs(5));
    assert!(status.success());
    assert!(!mock.lock_path.exists());
}

#[test]
fn test_stop_without_instance_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("gpclient.lock");

    let output = mock_command(&lock_path).arg("--stop").output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No lock file"));
}
