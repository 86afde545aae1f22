// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`process`] spawns a [`LaunchSpec`](crate::plan::LaunchSpec) with
//!   `tokio::process::Command`.
//! - [`readiness`] scans the debug bridge's stdout for its ready line.
//! - [`registry`] tracks background children and tears them down.

pub mod process;
pub mod readiness;
pub mod registry;

pub use process::spawn;
pub use readiness::{ReadyMatcher, ReadyOutcome, drain_in_background, wait_for_ready};
pub use registry::{ProcessSet, Termination, TerminationReport};
