use anyhow::Context;
use clap::Parser;
use sitetheme::commands::{Cli, execute};
use sitetheme::{config, logger};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match config::init_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    logger::setup_logger(config.logging()).context("Failed to initialize logger")?;

    match execute(cli.command, config, cli.json).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
