// src/session.rs

//! Session orchestration: serial terminal, then OpenOCD, wait for readiness,
//! then GDB in the foreground, then teardown.

use std::io::Write;
use std::process::ExitStatus;

use tokio::io::BufReader;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::errors::{Result, TestbenchError};
use crate::exec::{self, ProcessSet, ReadyOutcome, drain_in_background, wait_for_ready};
use crate::plan::{Readiness, Role, SessionPlan};
use crate::signals::ShutdownSignals;

/// Prompt shown after GDB exits while the serial terminal stays up.
const HOLD_PROMPT: &str = "--> ";

/// Execute `plan`, always tearing down every background child before
/// returning.
pub async fn execute(plan: &SessionPlan) -> Result<()> {
    let mut signals = ShutdownSignals::install()?;
    let mut processes = ProcessSet::new();

    let result = drive(plan, &mut processes, &mut signals).await;
    if let Err(err) = &result {
        warn!(error = %err, "session ended early; cleaning up");
    }

    let reports = processes.terminate_all(plan.grace_period).await;
    info!(stopped = reports.len(), "session torn down");

    result
}

async fn drive(
    plan: &SessionPlan,
    processes: &mut ProcessSet,
    signals: &mut ShutdownSignals,
) -> Result<()> {
    processes.track(Role::SerialTerminal, exec::spawn(&plan.serial)?);
    processes.track(Role::DebugBridge, exec::spawn(&plan.bridge)?);

    await_bridge(plan, processes, signals).await?;

    let mut debugger = exec::spawn(&plan.debugger)?;
    let waited = tokio::select! {
        status = debugger.wait() => Some(status),
        signal = signals.terminate() => {
            info!(%signal, "shutdown requested while debugger running");
            None
        }
    };
    let Some(status) = waited else {
        processes.track(Role::Debugger, debugger);
        return Err(TestbenchError::Interrupted("SIGTERM"));
    };
    report_debugger_exit(status?);

    signals.rearm_interrupt()?;
    if plan.hold_on_exit {
        hold(signals).await?;
    }
    Ok(())
}

async fn await_bridge(
    plan: &SessionPlan,
    processes: &mut ProcessSet,
    signals: &mut ShutdownSignals,
) -> Result<()> {
    match &plan.readiness {
        Readiness::Stdout { matcher, timeout } => {
            let stdout = processes.take_stdout(Role::DebugBridge).ok_or_else(|| {
                TestbenchError::Other(anyhow::anyhow!("debug bridge stdout was not captured"))
            })?;
            let mut reader = BufReader::new(stdout);

            info!(timeout = ?timeout, "waiting for debug bridge");
            let outcome = tokio::select! {
                outcome = wait_for_ready(&mut reader, matcher, *timeout) => outcome?,
                signal = signals.any() => return Err(TestbenchError::Interrupted(signal)),
            };

            match outcome {
                ReadyOutcome::Ready { line, lines_seen } => {
                    info!(%line, lines_seen, "debug bridge ready");
                    drain_in_background(reader, Role::DebugBridge, "stdout");
                    Ok(())
                }
                ReadyOutcome::StreamClosed { lines_seen } => {
                    Err(TestbenchError::BridgeClosed { lines_seen })
                }
                ReadyOutcome::TimedOut { lines_seen } => {
                    warn!(lines_seen, "no ready line from debug bridge");
                    Err(TestbenchError::ReadyTimeout(*timeout))
                }
            }
        }
        Readiness::Delay(delay) => {
            info!(delay = ?delay, "giving debug bridge time to start");
            tokio::select! {
                _ = tokio::time::sleep(*delay) => Ok(()),
                signal = signals.any() => Err(TestbenchError::Interrupted(signal)),
            }
        }
    }
}

fn report_debugger_exit(status: ExitStatus) {
    if status.success() {
        info!("debugger exited");
    } else {
        warn!(exit_code = ?status.code(), "debugger exited with failure");
    }
}

/// Wait for Enter (or EOF, or a signal) before tearing down.
///
/// Stdin is read on a plain thread so a pending read never holds the runtime
/// open at shutdown.
async fn hold(signals: &mut ShutdownSignals) -> Result<()> {
    {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(HOLD_PROMPT.as_bytes())?;
        stdout.flush()?;
    }

    let (tx, rx) = oneshot::channel::<()>();
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        let _ = tx.send(());
    });

    tokio::select! {
        _ = rx => {}
        signal = signals.any() => info!(%signal, "hold interrupted"),
    }
    Ok(())
}
