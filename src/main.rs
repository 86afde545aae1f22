// src/main.rs

use testbench::errors::TestbenchError;
use testbench::{cli, logging, run};

/// Conventional exit status for a session ended by SIGINT/SIGTERM.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        if let Some(TestbenchError::Interrupted(signal)) = err.downcast_ref::<TestbenchError>() {
            tracing::info!(%signal, "session interrupted");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        eprintln!("testbench error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await?;
    Ok(())
}
