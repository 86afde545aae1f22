// src/plan.rs

//! Argument-vector construction for the three session processes.
//!
//! Everything here is pure: given the config, the discovered paths and the CLI
//! choices, produce the exact argv each child will be spawned with. The
//! session module only executes a [`SessionPlan`].

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::config::{ReadinessMode, TestbenchConfig, parse_duration};
use crate::discover::resolve_tool;
use crate::errors::{Result, TestbenchError};
use crate::exec::readiness::ReadyMatcher;
use crate::privilege::elevation_prefix;

/// Which of the session processes a launch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    SerialTerminal,
    DebugBridge,
    Debugger,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::SerialTerminal => "serial terminal",
            Role::DebugBridge => "debug bridge",
            Role::Debugger => "debugger",
        };
        f.write_str(s)
    }
}

/// A single process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub role: Role,
    /// Full argument vector; `argv[0]` is the program.
    pub argv: Vec<String>,
    /// Pipe stdout back to us instead of inheriting it.
    pub capture_stdout: bool,
    /// Owns the controlling terminal (stdin inherited) and is waited on.
    pub foreground: bool,
}

impl LaunchSpec {
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// Shell-quoted command line, for logs and `--dry-run`.
    pub fn render(&self) -> String {
        shlex::try_join(self.argv.iter().map(String::as_str))
            .unwrap_or_else(|_| self.argv.join(" "))
    }
}

/// How the session waits for the debug bridge before starting the debugger.
#[derive(Debug, Clone)]
pub enum Readiness {
    Stdout {
        matcher: ReadyMatcher,
        timeout: Duration,
    },
    Delay(Duration),
}

#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub serial: LaunchSpec,
    pub bridge: LaunchSpec,
    pub debugger: LaunchSpec,
    pub readiness: Readiness,
    pub grace_period: Duration,
    pub hold_on_exit: bool,
}

/// Everything [`build_plan`] needs besides the config.
#[derive(Debug, Clone, Copy)]
pub struct PlanInputs<'a> {
    pub config: &'a TestbenchConfig,
    pub repo_root: &'a Path,
    pub make_root: &'a Path,
    pub project: &'a str,
    pub log_file: Option<&'a Path>,
    pub already_elevated: bool,
}

pub fn build_plan(inputs: &PlanInputs<'_>) -> Result<SessionPlan> {
    let cfg = inputs.config;
    let elevate = elevation_prefix(&cfg.launch.elevate_with, inputs.already_elevated);

    let make_base = vec![
        cfg.launch.make.clone(),
        "-C".to_string(),
        inputs.make_root.to_string_lossy().into_owned(),
    ];

    let serial = serial_spec(inputs, &elevate)?;

    let bridge_hosted = cfg.bridge.readiness == ReadinessMode::Delay;
    let mut bridge_cmd = make_base.clone();
    bridge_cmd.push(cfg.bridge.make_target.clone());
    let bridge = LaunchSpec {
        role: Role::DebugBridge,
        argv: wrap(
            bridge_cmd,
            bridge_hosted.then_some(cfg.launch.terminal.as_slice()),
            cfg.bridge.elevate.then_some(elevate.as_slice()),
        ),
        capture_stdout: !bridge_hosted,
        foreground: false,
    };

    let mut debugger_argv = make_base;
    debugger_argv.push(format!("PROJECT={}", inputs.project));
    debugger_argv.push(cfg.debugger.make_target.clone());
    let debugger = LaunchSpec {
        role: Role::Debugger,
        argv: debugger_argv,
        capture_stdout: false,
        foreground: true,
    };

    let readiness = match cfg.bridge.readiness {
        ReadinessMode::Stdout => Readiness::Stdout {
            matcher: ReadyMatcher::from_config(&cfg.bridge.ready_line, cfg.bridge.ready_regex)?,
            timeout: duration_field("[bridge].timeout", &cfg.bridge.timeout)?,
        },
        ReadinessMode::Delay => {
            Readiness::Delay(duration_field("[bridge].delay", &cfg.bridge.delay)?)
        }
    };

    Ok(SessionPlan {
        serial,
        bridge,
        debugger,
        readiness,
        grace_period: duration_field("[launch].grace_period", &cfg.launch.grace_period)?,
        hold_on_exit: cfg.launch.hold_on_exit,
    })
}

fn serial_spec(inputs: &PlanInputs<'_>, elevate: &[String]) -> Result<LaunchSpec> {
    let cfg = inputs.config;
    let program = resolve_tool(&cfg.serial.program, inputs.repo_root);
    let mut cmd = vec![
        program.to_string_lossy().into_owned(),
        "-b".to_string(),
        cfg.serial.baud.to_string(),
    ];

    if let Some(log_file) = inputs.log_file {
        cmd = tee_through_shell(&cmd, log_file)?;
    }

    Ok(LaunchSpec {
        role: Role::SerialTerminal,
        argv: wrap(
            cmd,
            cfg.serial.hosted.then_some(cfg.launch.terminal.as_slice()),
            cfg.serial.elevate.then_some(elevate),
        ),
        capture_stdout: false,
        foreground: false,
    })
}

/// `sh -c '<cmd> | tee -a <log>'`, so the hosted window still shows the output.
fn tee_through_shell(cmd: &[String], log_file: &Path) -> Result<Vec<String>> {
    let quote_err = |e: shlex::QuoteError| {
        TestbenchError::ConfigError(format!("cannot quote serial command: {e}"))
    };
    let inner = shlex::try_join(cmd.iter().map(String::as_str)).map_err(quote_err)?;
    let log = log_file.to_string_lossy();
    let log = shlex::try_quote(&log).map_err(quote_err)?;

    Ok(vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("{inner} | tee -a {log}"),
    ])
}

/// `[elevate..] [terminal..] cmd..`
fn wrap(cmd: Vec<String>, terminal: Option<&[String]>, elevate: Option<&[String]>) -> Vec<String> {
    let mut argv = Vec::with_capacity(cmd.len() + 4);
    if let Some(prefix) = elevate {
        argv.extend_from_slice(prefix);
    }
    if let Some(prefix) = terminal {
        argv.extend_from_slice(prefix);
    }
    argv.extend(cmd);
    argv
}

fn duration_field(field: &str, value: &str) -> Result<Duration> {
    parse_duration(value)
        .map_err(|e| TestbenchError::ConfigError(format!("invalid {field}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(argv: &[&str]) -> LaunchSpec {
        LaunchSpec {
            role: Role::Debugger,
            argv: argv.iter().map(|s| s.to_string()).collect(),
            capture_stdout: false,
            foreground: true,
        }
    }

    #[test]
    fn render_quotes_arguments_with_spaces() {
        let s = spec(&["make", "-C", "/home/me/my lab/code", "gdb"]);
        let rendered = s.render();
        assert!(rendered.starts_with("make -C "));
        assert_eq!(shlex::split(&rendered), Some(s.argv.clone()));
        assert_eq!(s.program(), "make");
        assert_eq!(s.args().len(), 3);
    }

    #[test]
    fn wrap_orders_elevation_before_terminal() {
        let argv = wrap(
            vec!["ftditerm.py".into()],
            Some(&["xterm".to_string(), "-e".to_string()][..]),
            Some(&["sudo".to_string()][..]),
        );
        assert_eq!(argv, vec!["sudo", "xterm", "-e", "ftditerm.py"]);
    }

    #[test]
    fn role_names_read_naturally() {
        assert_eq!(Role::DebugBridge.to_string(), "debug bridge");
    }
}
