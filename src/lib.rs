// src/lib.rs

pub mod cli;
pub mod config;
pub mod discover;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod plan;
pub mod privilege;
pub mod session;
pub mod signals;

use std::path::Path;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{TestbenchConfig, load_for_repo, validate_config};
use crate::errors::Result;
use crate::plan::{PlanInputs, Readiness, SessionPlan, build_plan};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - repository / make root / project discovery
/// - config loading + CLI overrides
/// - the launch plan
/// - the session (spawn, readiness wait, debugger, teardown)
pub async fn run(args: CliArgs) -> Result<()> {
    let repo_root = discover::repo_root().await?;

    let mut cfg = load_for_repo(args.config.as_deref(), &repo_root)?;
    apply_cli_overrides(&mut cfg, &args);
    validate_config(&cfg)?;

    let make_root = discover::make_root(&repo_root, &cfg.paths);
    let (project, projects) = discover::resolve_project(
        args.project.as_deref(),
        discover::list_projects(&make_root, &cfg.paths.project_glob),
    )?;
    info!(repo = %repo_root.display(), %project, "resolved project");

    let plan = build_plan(&PlanInputs {
        config: &cfg,
        repo_root: &repo_root,
        make_root: &make_root,
        project: &project,
        log_file: args.log.as_deref(),
        already_elevated: privilege::is_elevated(),
    })?;

    if args.dry_run {
        print_dry_run(&plan, &make_root, &projects);
        return Ok(());
    }

    session::execute(&plan).await
}

/// Fold CLI flags that shadow config values into `cfg`.
pub fn apply_cli_overrides(cfg: &mut TestbenchConfig, args: &CliArgs) {
    if let Some(secs) = args.timeout {
        cfg.bridge.timeout = format!("{secs}s");
    }
    if args.no_hold {
        cfg.launch.hold_on_exit = false;
    }
}

/// Dry-run output: print projects, argument vectors and readiness strategy.
fn print_dry_run(plan: &SessionPlan, make_root: &Path, projects: &[String]) {
    println!("testbench dry-run");
    println!("  make root: {}", make_root.display());
    println!("  projects: {}", projects.join(", "));
    println!();

    for spec in [&plan.serial, &plan.bridge, &plan.debugger] {
        println!("{}:", spec.role);
        println!("    {}", spec.render());
        if spec.capture_stdout {
            println!("    stdout: piped");
        }
    }
    println!();

    match &plan.readiness {
        Readiness::Stdout { matcher, timeout } => {
            println!("readiness: wait for {matcher:?} on bridge stdout (timeout {timeout:?})");
        }
        Readiness::Delay(delay) => println!("readiness: fixed delay of {delay:?}"),
    }
    println!("grace period: {:?}", plan.grace_period);
    println!("hold on exit: {}", plan.hold_on_exit);

    debug!("dry-run complete (no execution)");
}
