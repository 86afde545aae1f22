// src/exec/registry.rs

use std::time::Duration;

use tokio::process::{Child, ChildStdout};
use tokio::time;
use tracing::{debug, info, warn};

use crate::plan::Role;

/// How a tracked child ended up after [`ProcessSet::terminate_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Had already exited on its own (exit code if it had one).
    AlreadyExited(Option<i32>),
    /// Exited within the grace period after SIGTERM.
    Terminated,
    /// Needed SIGKILL.
    Killed,
    /// Could not be signalled or did not die; the message says why.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationReport {
    pub role: Role,
    pub pid: Option<u32>,
    pub termination: Termination,
}

struct TrackedChild {
    role: Role,
    pid: Option<u32>,
    child: Child,
}

/// Background children of a session, terminated together on the way out.
#[derive(Default)]
pub struct ProcessSet {
    children: Vec<TrackedChild>,
}

impl ProcessSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, role: Role, child: Child) {
        let pid = child.id();
        debug!(%role, ?pid, "tracking child");
        self.children.push(TrackedChild { role, pid, child });
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Take the piped stdout of the first tracked child with `role`.
    pub fn take_stdout(&mut self, role: Role) -> Option<ChildStdout> {
        self.children
            .iter_mut()
            .find(|c| c.role == role)
            .and_then(|c| c.child.stdout.take())
    }

    /// Terminate every tracked child, most recently spawned first.
    ///
    /// Each child still running gets SIGTERM, then SIGKILL if it outlives
    /// `grace`. Errors are logged and reported, never returned, so one stuck
    /// child cannot keep the others alive. The set is empty afterwards.
    ///
    /// Signals go to the direct child only (`sudo`, `xterm`, `make`), not to
    /// its process group or descendants. Whatever runs below it is expected
    /// to exit when its parent does; this is not a process-tree kill.
    pub async fn terminate_all(&mut self, grace: Duration) -> Vec<TerminationReport> {
        let mut reports = Vec::with_capacity(self.children.len());

        while let Some(mut tracked) = self.children.pop() {
            let termination = terminate_child(&mut tracked, grace).await;
            match &termination {
                Termination::Failed(reason) => warn!(
                    role = %tracked.role,
                    pid = ?tracked.pid,
                    %reason,
                    "could not terminate child"
                ),
                other => info!(
                    role = %tracked.role,
                    pid = ?tracked.pid,
                    outcome = ?other,
                    "child stopped"
                ),
            }
            reports.push(TerminationReport {
                role: tracked.role,
                pid: tracked.pid,
                termination,
            });
        }

        reports
    }
}

async fn terminate_child(tracked: &mut TrackedChild, grace: Duration) -> Termination {
    match tracked.child.try_wait() {
        Ok(Some(status)) => return Termination::AlreadyExited(status.code()),
        Ok(None) => {}
        Err(e) => warn!(role = %tracked.role, error = %e, "try_wait failed; signalling anyway"),
    }

    match tracked.pid {
        Some(pid) => match send_sigterm(pid) {
            Ok(()) => {
                if let Ok(Ok(_)) = time::timeout(grace, tracked.child.wait()).await {
                    return Termination::Terminated;
                }
                debug!(role = %tracked.role, pid, "still running after grace period");
            }
            Err(reason) => {
                debug!(role = %tracked.role, pid, %reason, "SIGTERM failed; escalating");
            }
        },
        None => return Termination::AlreadyExited(None),
    }

    if let Err(e) = tracked.child.start_kill() {
        return Termination::Failed(format!("SIGKILL failed: {e}"));
    }
    match time::timeout(grace, tracked.child.wait()).await {
        Ok(Ok(_)) => Termination::Killed,
        Ok(Err(e)) => Termination::Failed(format!("waiting after SIGKILL: {e}")),
        Err(_) => Termination::Failed("still running after SIGKILL".to_string()),
    }
}

#[cfg(unix)]
fn send_sigterm(pid: u32) -> std::result::Result<(), String> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| format!("pid {pid} out of range"))?;
    kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(|e| format!("SIGTERM failed: {e}"))
}

#[cfg(not(unix))]
fn send_sigterm(_pid: u32) -> std::result::Result<(), String> {
    Err("SIGTERM is not available on this platform".to_string())
}
