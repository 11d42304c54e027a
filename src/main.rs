// HydraAI - main.rs
// Parses the command line, loads configuration, installs logging and runs
// the requested command.

use clap::Parser;
use hydra_irrigation::cli::{dispatch, Cli};
use hydra_irrigation::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_tracing(&config.log_level)?;

    dispatch(cli, config).await?;
    Ok(())
}
