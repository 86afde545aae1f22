// src/config/validate.rs

use regex::Regex;

use crate::config::duration::parse_duration;
use crate::config::model::{ReadinessMode, TestbenchConfig};
use crate::errors::{Result, TestbenchError};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - the make program, serial program and project glob are non-empty
/// - `baud > 0`
/// - a terminal prefix exists when anything is hosted in a window
/// - `ready_line` is non-empty (and a valid regex when `ready_regex = true`)
/// - every duration string parses, and the readiness timeout is non-zero
pub fn validate_config(cfg: &TestbenchConfig) -> Result<()> {
    validate_paths(cfg)?;
    validate_launch(cfg)?;
    validate_serial(cfg)?;
    validate_bridge(cfg)?;
    Ok(())
}

fn invalid(msg: impl Into<String>) -> TestbenchError {
    TestbenchError::ConfigError(msg.into())
}

fn validate_paths(cfg: &TestbenchConfig) -> Result<()> {
    if cfg.paths.project_glob.trim().is_empty() {
        return Err(invalid("[paths].project_glob must not be empty"));
    }
    Ok(())
}

fn validate_launch(cfg: &TestbenchConfig) -> Result<()> {
    if cfg.launch.make.trim().is_empty() {
        return Err(invalid("[launch].make must not be empty"));
    }

    let hosts_something =
        cfg.serial.hosted || cfg.bridge.readiness == ReadinessMode::Delay;
    if hosts_something && cfg.launch.terminal.is_empty() {
        return Err(invalid(
            "[launch].terminal must not be empty when a process is hosted in a terminal",
        ));
    }

    let elevates_something = cfg.serial.elevate || cfg.bridge.elevate;
    if elevates_something && cfg.launch.elevate_with.trim().is_empty() {
        return Err(invalid(
            "[launch].elevate_with must not be empty when a process is elevated",
        ));
    }

    parse_duration(&cfg.launch.grace_period)
        .map_err(|e| invalid(format!("invalid [launch].grace_period: {e}")))?;
    Ok(())
}

fn validate_serial(cfg: &TestbenchConfig) -> Result<()> {
    if cfg.serial.program.trim().is_empty() {
        return Err(invalid("[serial].program must not be empty"));
    }
    if cfg.serial.baud == 0 {
        return Err(invalid("[serial].baud must be > 0 (got 0)"));
    }
    Ok(())
}

fn validate_bridge(cfg: &TestbenchConfig) -> Result<()> {
    let bridge = &cfg.bridge;

    if bridge.ready_line.is_empty() {
        return Err(invalid("[bridge].ready_line must not be empty"));
    }
    if bridge.ready_regex {
        Regex::new(&bridge.ready_line)
            .map_err(|e| invalid(format!("invalid [bridge].ready_line regex: {e}")))?;
    }

    let timeout = parse_duration(&bridge.timeout)
        .map_err(|e| invalid(format!("invalid [bridge].timeout: {e}")))?;
    if timeout.is_zero() {
        return Err(invalid("[bridge].timeout must be greater than zero"));
    }

    parse_duration(&bridge.delay)
        .map_err(|e| invalid(format!("invalid [bridge].delay: {e}")))?;
    Ok(())
}
