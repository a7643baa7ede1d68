//! Binary-level tests: argument validation and single-cycle runs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn treesync() -> Command {
    Command::cargo_bin("treesync").expect("binary should be built")
}

#[test]
fn test_missing_source_fails() {
    let dst = TempDir::new().unwrap();

    treesync()
        .args(["--source", "/definitely/not/here", "--replica"])
        .arg(dst.path())
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_negative_interval_fails() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    treesync()
        .arg("-s")
        .arg(src.path())
        .arg("-r")
        .arg(dst.path())
        .args(["-i", "-2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn test_missing_replica_argument_fails() {
    let src = TempDir::new().unwrap();

    treesync()
        .arg("-s")
        .arg(src.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("replica"));
}

#[test]
fn test_once_mirrors_and_logs_to_file() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();
    let log_file = logs.path().join("sync.log");
    fs::write(src.path().join("a.txt"), b"hi").unwrap();
    fs::create_dir(src.path().join("dir")).unwrap();
    fs::write(dst.path().join("old.txt"), b"stale").unwrap();

    treesync()
        .arg("-s")
        .arg(src.path())
        .arg("-r")
        .arg(dst.path())
        .arg("-l")
        .arg(&log_file)
        .arg("--once")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("Synchronization completed."));

    assert_eq!(fs::read(dst.path().join("a.txt")).unwrap(), b"hi");
    assert!(dst.path().join("dir").is_dir());
    assert!(!dst.path().join("old.txt").exists());

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("Synchronization started."));
    assert!(log.contains("Synchronization completed."));
    assert!(log.contains("Removing"));
}

#[test]
fn test_max_cycles_bounds_the_loop() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();
    let log_file = logs.path().join("sync.log");
    fs::write(src.path().join("a.txt"), b"hi").unwrap();

    treesync()
        .arg("-s")
        .arg(src.path())
        .arg("-r")
        .arg(dst.path())
        .arg("-l")
        .arg(&log_file)
        .args(["-i", "0", "--max-cycles", "2"])
        .env_remove("RUST_LOG")
        .assert()
        .success();

    let log = fs::read_to_string(&log_file).unwrap();
    assert_eq!(log.matches("Synchronization started.").count(), 2);
    assert!(log.contains("Replica already up to date"));
}

#[test]
#[cfg(unix)]
fn test_sigterm_stops_loop_and_flushes_log() {
    use std::process::{Command as StdCommand, Stdio};
    use std::thread;
    use std::time::{Duration, Instant};

    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();
    let log_file = logs.path().join("sync.log");
    fs::write(src.path().join("a.txt"), b"hi").unwrap();

    let mut child = StdCommand::new(assert_cmd::cargo::cargo_bin("treesync"))
        .arg("-s")
        .arg(src.path())
        .arg("-r")
        .arg(dst.path())
        .arg("-l")
        .arg(&log_file)
        .args(["-i", "3600"])
        .env_remove("RUST_LOG")
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Wait for the first cycle to finish copying
    let deadline = Instant::now() + Duration::from_secs(30);
    while !dst.path().join("a.txt").exists() {
        assert!(Instant::now() < deadline, "first cycle never ran");
        thread::sleep(Duration::from_millis(50));
    }

    let killed = StdCommand::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("daemon ignored SIGTERM");
        }
        thread::sleep(Duration::from_millis(50));
    };

    assert!(status.success());
    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("Synchronization completed."));
    assert!(log.contains("treesync stopped"));
}
