// tests/process_cleanup.rs
#![cfg(unix)]

use std::error::Error;
use std::time::{Duration, Instant};

use testbench::exec::{self, ProcessSet, Termination};
use testbench::plan::{LaunchSpec, Role};
use testbench_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn background(role: Role, argv: &[&str]) -> LaunchSpec {
    LaunchSpec {
        role,
        argv: argv.iter().map(|s| s.to_string()).collect(),
        capture_stdout: false,
        foreground: false,
    }
}

#[tokio::test]
async fn already_exited_children_are_skipped() -> TestResult {
    init_tracing();

    let mut processes = ProcessSet::new();
    let mut child = exec::spawn(&background(Role::SerialTerminal, &["sh", "-c", "exit 3"]))?;
    // Let it finish before handing it over.
    child.wait().await?;
    processes.track(Role::SerialTerminal, child);

    let reports = processes.terminate_all(Duration::from_secs(1)).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].termination, Termination::AlreadyExited(Some(3)));
    Ok(())
}

#[tokio::test]
async fn sigterm_ignoring_child_is_killed_after_grace() -> TestResult {
    init_tracing();

    let mut processes = ProcessSet::new();
    processes.track(
        Role::DebugBridge,
        exec::spawn(&background(
            Role::DebugBridge,
            &["sh", "-c", "trap '' TERM; while :; do sleep 1; done"],
        ))?,
    );
    // Give the shell time to install its trap.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    let reports = processes.terminate_all(Duration::from_millis(300)).await;

    assert_eq!(reports[0].termination, Termination::Killed);
    assert!(started.elapsed() >= Duration::from_millis(300));
    Ok(())
}

#[tokio::test]
async fn every_child_is_stopped_newest_first() -> TestResult {
    init_tracing();

    let mut processes = ProcessSet::new();
    processes.track(
        Role::SerialTerminal,
        exec::spawn(&background(Role::SerialTerminal, &["sleep", "30"]))?,
    );
    processes.track(
        Role::DebugBridge,
        exec::spawn(&background(Role::DebugBridge, &["sleep", "30"]))?,
    );
    assert_eq!(processes.len(), 2);

    let reports = processes.terminate_all(Duration::from_secs(5)).await;
    let roles: Vec<Role> = reports.iter().map(|r| r.role).collect();
    assert_eq!(roles, vec![Role::DebugBridge, Role::SerialTerminal]);
    assert!(
        reports
            .iter()
            .all(|r| r.termination == Termination::Terminated && r.pid.is_some())
    );

    // A second teardown has nothing left to do.
    assert!(processes.terminate_all(Duration::from_secs(5)).await.is_empty());
    Ok(())
}
