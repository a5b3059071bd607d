//! Deposit Switch - Entry Point
//!
//! Loads configuration, installs logging, wires the gateway and runs one
//! command. Lives in the `dsw` facade crate next to the library.

// Force-link dsw-providers to ensure linkme adapter registrations are included
extern crate dsw_providers;

use anyhow::Context;
use clap::Parser;
use dsw::cli::{Cli, execute};
use dsw_infrastructure::logging::init_logging;
use dsw_infrastructure::{ConfigLoader, init_app};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    let context = init_app(config).context("Failed to initialize application")?;
    debug!(command = ?cli.command, "Running command");

    let output = execute(&context, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
