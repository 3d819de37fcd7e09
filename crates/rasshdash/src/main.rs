//! rasshdash - live dashboard for the RASSH honeypot
//!
//! Without a subcommand it runs the terminal dashboard.

use anyhow::Result;
use clap::Parser;
use rasshdash::cli::{Cli, Commands};
use rasshdash::config::DashConfig;
use rasshdash::errors::{EXIT_CONFIG_ERROR, EXIT_GENERAL_ERROR, EXIT_SUCCESS};
use rasshdash::{logging, runtime, status_command};
use std::process;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match DashConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_base_url(cli.url.as_deref()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_CONFIG_ERROR);
        }
    };

    let command = cli.command.unwrap_or(Commands::Watch);
    // Status prints to stdout, so its log lines stay on stderr
    let headless = cli.headless || matches!(command, Commands::Status { .. });
    let target = logging::target_for(&config.log, headless);
    if let Err(e) = logging::init(&config.log, &target) {
        eprintln!("Warning: {:#}", e);
    }

    let code = match command {
        Commands::Watch => match runtime::watch(&config, cli.headless).await {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Dashboard failed");
                eprintln!("Error: {:#}", e);
                EXIT_GENERAL_ERROR
            }
        },
        Commands::Status { json } => status_command::run(&config, json).await?,
    };

    if code != EXIT_SUCCESS {
        process::exit(code);
    }
    Ok(())
}
