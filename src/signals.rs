// src/signals.rs

//! SIGINT / SIGTERM listeners for the session.
//!
//! Installing the listeners replaces the default "die" disposition, so a
//! Ctrl-C never skips cleanup. While GDB runs in the foreground it receives
//! the same Ctrl-C (to interrupt the target), so the session only honours
//! SIGTERM during that phase and re-arms SIGINT afterwards.

use crate::errors::Result;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

pub struct ShutdownSignals {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    pub fn install() -> Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Resolve on the next SIGINT or SIGTERM; yields the signal name.
    pub async fn any(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }

    /// Resolve on the next SIGTERM only.
    pub async fn terminate(&mut self) -> &'static str {
        self.terminate.recv().await;
        "SIGTERM"
    }

    /// Forget SIGINTs delivered so far (e.g. ones meant for GDB).
    pub fn rearm_interrupt(&mut self) -> Result<()> {
        self.interrupt = signal(SignalKind::interrupt())?;
        Ok(())
    }
}

#[cfg(not(unix))]
impl ShutdownSignals {
    pub fn install() -> Result<Self> {
        Ok(Self {})
    }

    pub async fn any(&mut self) -> &'static str {
        let _ = tokio::signal::ctrl_c().await;
        "SIGINT"
    }

    pub async fn terminate(&mut self) -> &'static str {
        std::future::pending::<()>().await;
        "SIGTERM"
    }

    pub fn rearm_interrupt(&mut self) -> Result<()> {
        Ok(())
    }
}
