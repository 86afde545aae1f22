// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from `Testbench.toml`.
///
/// ```toml
/// [serial]
/// program = "/opt/18349/ftditerm/ftditerm.py"
///
/// [bridge]
/// ready_line = "openocd -f 349util/rpi2.cfg"
/// timeout = "60s"
///
/// [launch]
/// make = "gmake"
/// ```
///
/// Every section and field is optional; the defaults describe the stock lab
/// machine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestbenchConfig {
    pub paths: PathsSection,
    pub serial: SerialSection,
    pub bridge: BridgeSection,
    pub debugger: DebuggerSection,
    pub launch: LaunchSection,
}

/// `[paths]`: where the make tree and the projects live inside the repo.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Make root, relative to the repository top level.
    pub code_dir: String,

    /// Glob matched against directory names under the make root.
    pub project_glob: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            code_dir: "code".to_string(),
            project_glob: "kernel*".to_string(),
        }
    }
}

/// `[serial]`: the ftditerm serial terminal.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerialSection {
    /// Absolute path, repo-relative path, or bare name looked up on `PATH`.
    pub program: String,
    pub baud: u32,

    /// Run inside the terminal emulator from `[launch].terminal`.
    pub hosted: bool,

    /// Run through `[launch].elevate_with` (USB access needs root).
    pub elevate: bool,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            program: "ftditerm.py".to_string(),
            baud: 115_200,
            hosted: true,
            elevate: true,
        }
    }
}

/// How the session decides OpenOCD is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessMode {
    /// Pipe OpenOCD's stdout and wait for `ready_line`.
    #[default]
    Stdout,
    /// Host OpenOCD in a terminal window and sleep for `delay`.
    Delay,
}

/// `[bridge]`: OpenOCD, started through the make tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    pub make_target: String,
    pub elevate: bool,

    /// Line that marks OpenOCD as ready.
    pub ready_line: String,

    /// Treat `ready_line` as a regex instead of a literal substring.
    pub ready_regex: bool,

    /// Upper bound on the readiness wait (duration string).
    pub timeout: String,

    pub readiness: ReadinessMode,

    /// Fixed wait used when `readiness = "delay"` (duration string).
    pub delay: String,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            make_target: "openocd".to_string(),
            elevate: true,
            ready_line: "openocd -f 349util/rpi2.cfg".to_string(),
            ready_regex: false,
            timeout: "60s".to_string(),
            readiness: ReadinessMode::Stdout,
            delay: "15s".to_string(),
        }
    }
}

/// `[debugger]`: GDB, started through the make tree with `PROJECT=<name>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DebuggerSection {
    pub make_target: String,
}

impl Default for DebuggerSection {
    fn default() -> Self {
        Self {
            make_target: "gdb".to_string(),
        }
    }
}

/// `[launch]`: how processes are started and torn down.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LaunchSection {
    /// Make program; some machines need `gmake`.
    pub make: String,

    /// Argument prefix that hosts a command in its own terminal window.
    pub terminal: Vec<String>,

    /// Privilege helper prepended to elevated commands unless already root.
    pub elevate_with: String,

    /// How long a child gets between SIGTERM and SIGKILL (duration string).
    pub grace_period: String,

    /// Wait for Enter after GDB exits before tearing down.
    pub hold_on_exit: bool,
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            make: "make".to_string(),
            terminal: vec!["xterm".to_string(), "-e".to_string()],
            elevate_with: "sudo".to_string(),
            grace_period: "2s".to_string(),
            hold_on_exit: true,
        }
    }
}
