// tests/launch_plan.rs

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use testbench::config::TestbenchConfig;
use testbench::plan::{PlanInputs, Readiness, Role, SessionPlan, build_plan};
use testbench_test_utils::builders::ConfigBuilder;
use testbench_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

const REPO: &str = "/home/student/349-lab";
const MAKE_ROOT: &str = "/home/student/349-lab/code";

fn plan_for(
    cfg: &TestbenchConfig,
    project: &str,
    log_file: Option<&Path>,
    already_elevated: bool,
) -> testbench::errors::Result<SessionPlan> {
    build_plan(&PlanInputs {
        config: cfg,
        repo_root: Path::new(REPO),
        make_root: Path::new(MAKE_ROOT),
        project,
        log_file,
        already_elevated,
    })
}

#[test]
fn default_plan_matches_lab_commands() -> TestResult {
    init_tracing();

    let cfg = TestbenchConfig::default();
    let plan = plan_for(&cfg, "kernel", None, false)?;

    assert_eq!(plan.serial.role, Role::SerialTerminal);
    assert_eq!(
        plan.serial.argv,
        vec!["sudo", "xterm", "-e", "ftditerm.py", "-b", "115200"]
    );
    assert!(!plan.serial.capture_stdout);
    assert!(!plan.serial.foreground);

    assert_eq!(plan.bridge.role, Role::DebugBridge);
    assert_eq!(plan.bridge.argv, vec!["sudo", "make", "-C", MAKE_ROOT, "openocd"]);
    assert!(plan.bridge.capture_stdout, "stdout readiness needs the pipe");

    assert_eq!(plan.debugger.role, Role::Debugger);
    assert_eq!(
        plan.debugger.argv,
        vec!["make", "-C", MAKE_ROOT, "PROJECT=kernel", "gdb"]
    );
    assert!(plan.debugger.foreground);

    match &plan.readiness {
        Readiness::Stdout { matcher, timeout } => {
            assert!(matcher.is_match("openocd -f 349util/rpi2.cfg"));
            assert_eq!(*timeout, Duration::from_secs(60));
        }
        other => panic!("expected stdout readiness, got {other:?}"),
    }
    assert_eq!(plan.grace_period, Duration::from_secs(2));
    assert!(plan.hold_on_exit);

    Ok(())
}

#[test]
fn root_does_not_stack_sudo() -> TestResult {
    let plan = plan_for(&TestbenchConfig::default(), "kernel", None, true)?;

    assert_eq!(plan.serial.argv[0], "xterm");
    assert_eq!(plan.bridge.argv[0], "make");
    Ok(())
}

#[test]
fn project_flows_into_debugger_only() -> TestResult {
    let plan = plan_for(&TestbenchConfig::default(), "kernel_lab4", None, false)?;

    assert!(plan.debugger.argv.contains(&"PROJECT=kernel_lab4".to_string()));
    assert!(!plan.bridge.argv.iter().any(|a| a.starts_with("PROJECT=")));
    Ok(())
}

#[test]
fn log_file_tees_serial_output_through_shell() -> TestResult {
    let cfg = ConfigBuilder::new()
        .with_serial_program("tools/ftditerm/ftditerm.py")
        .build();
    let plan = plan_for(&cfg, "kernel", Some(Path::new("/tmp/my uart.log")), false)?;

    let argv = &plan.serial.argv;
    assert_eq!(&argv[..5], &["sudo", "xterm", "-e", "sh", "-c"]);
    assert_eq!(argv.len(), 6);

    let script = &argv[5];
    let (serial_cmd, tee_cmd) = script.split_once(" | ").expect("pipeline");
    assert_eq!(
        shlex::split(serial_cmd),
        Some(vec![
            format!("{REPO}/tools/ftditerm/ftditerm.py"),
            "-b".to_string(),
            "115200".to_string(),
        ])
    );
    assert_eq!(
        shlex::split(tee_cmd),
        Some(vec![
            "tee".to_string(),
            "-a".to_string(),
            "/tmp/my uart.log".to_string()
        ])
    );
    Ok(())
}

#[test]
fn delay_readiness_hosts_the_bridge() -> TestResult {
    let cfg = ConfigBuilder::new().with_delay_readiness("15s").build();
    let plan = plan_for(&cfg, "kernel", None, false)?;

    assert_eq!(
        plan.bridge.argv,
        vec!["sudo", "xterm", "-e", "make", "-C", MAKE_ROOT, "openocd"]
    );
    assert!(!plan.bridge.capture_stdout);
    assert!(matches!(plan.readiness, Readiness::Delay(d) if d == Duration::from_secs(15)));
    Ok(())
}

#[test]
fn unelevated_unhosted_serial_is_bare() -> TestResult {
    let cfg = ConfigBuilder::new()
        .unhosted_serial()
        .without_elevation()
        .with_baud(9600)
        .with_make("gmake")
        .build();
    let plan = plan_for(&cfg, "kernel", None, false)?;

    assert_eq!(plan.serial.argv, vec!["ftditerm.py", "-b", "9600"]);
    assert_eq!(plan.bridge.argv, vec!["gmake", "-C", MAKE_ROOT, "openocd"]);
    assert_eq!(plan.debugger.program(), "gmake");
    Ok(())
}

#[test]
fn invalid_regex_fails_plan_construction() {
    let cfg = ConfigBuilder::new().with_ready_regex("([a-z]").build();
    assert!(plan_for(&cfg, "kernel", None, false).is_err());
}
