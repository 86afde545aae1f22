// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `testbench`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "testbench",
    version,
    about = "Run the RPi/JTAG testbench: serial terminal, OpenOCD and GDB.",
    long_about = None
)]
pub struct CliArgs {
    /// PROJECT variable passed to make for the debugger [default: kernel].
    ///
    /// An explicit value must name a directory under the make root matching
    /// `paths.project_glob`.
    #[arg(short = 'p', long, value_name = "NAME")]
    pub project: Option<String>,

    /// File to copy serial terminal output to (appended).
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Path to a TOML config file.
    ///
    /// If omitted, `TESTBENCH_CONFIG` or `<repo>/Testbench.toml` is used when
    /// present, otherwise built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seconds to wait for OpenOCD to come up before giving up.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TESTBENCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve paths and print the launch plan without spawning anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Tear everything down as soon as GDB exits instead of waiting for Enter.
    #[arg(long)]
    pub no_hold: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lab_setup() {
        let args = CliArgs::try_parse_from(["testbench"]).unwrap();
        assert!(args.project.is_none());
        assert!(args.log.is_none());
        assert!(!args.dry_run);
        assert!(!args.no_hold);
    }

    #[test]
    fn short_project_flag_and_log_file() {
        let args =
            CliArgs::try_parse_from(["testbench", "-p", "kernel_lab4", "--log", "uart.log"])
                .unwrap();
        assert_eq!(args.project.as_deref(), Some("kernel_lab4"));
        assert_eq!(args.log, Some(PathBuf::from("uart.log")));
    }

    #[test]
    fn timeout_must_be_numeric() {
        assert!(CliArgs::try_parse_from(["testbench", "--timeout", "soon"]).is_err());
    }
}
