// src/exec/process.rs

use std::process::Stdio;

use tokio::io::BufReader;
use tokio::process::{Child, Command};
use tracing::info;

use crate::errors::{Result, TestbenchError};
use crate::exec::readiness::drain_in_background;
use crate::plan::LaunchSpec;

/// Spawn one session process.
///
/// Background processes get a null stdin so the hold prompt and the debugger
/// keep the terminal; the foreground process inherits everything. Children
/// are killed if their handle is dropped.
///
/// A process with captured stdout also has its stderr piped and drained at
/// debug level from the moment it starts, so OpenOCD's log never reaches the
/// debugger's terminal and never stalls on a full pipe. Must be called from
/// within a Tokio runtime.
pub fn spawn(spec: &LaunchSpec) -> Result<Child> {
    let mut cmd = Command::new(spec.program());
    cmd.args(spec.args()).kill_on_drop(true);

    if spec.capture_stdout {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }
    if spec.foreground {
        cmd.stdin(Stdio::inherit());
    } else {
        cmd.stdin(Stdio::null());
    }

    let mut child = cmd.spawn().map_err(|source| TestbenchError::Spawn {
        role: spec.role,
        program: spec.program().to_string(),
        source,
    })?;

    if let Some(stderr) = child.stderr.take() {
        drain_in_background(BufReader::new(stderr), spec.role, "stderr");
    }

    info!(
        role = %spec.role,
        pid = child.id(),
        cmd = %spec.render(),
        "spawned process"
    );
    Ok(child)
}
