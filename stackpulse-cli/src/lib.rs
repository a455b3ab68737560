//! # stackpulse-cli
//!
//! Command-line front end for the stackpulse health engine.
//!
//! - [`cli`]: clap argument definitions
//! - [`commands`]: `check`, `watch` and `config` handlers
//! - [`sink`]: console and JSON file report sinks
//! - [`output`]: text / JSON output switching
//! - [`logging`], [`metrics_server`]: process-wide tracing and Prometheus setup

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod metrics_server;
pub mod output;
pub mod sink;

use stackpulse_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::commands::{Overrides, load_config};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Dispatches a parsed command line.
///
/// Configuration is loaded before logging starts so the configured level
/// and format apply; `config` subcommands report load errors themselves.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let overrides = Overrides::from_cli(&cli);

    match cli.command {
        Commands::Config(args) => {
            let mut general = GeneralConfig::default();
            if let Some(level) = &overrides.log_level {
                general.log_level = level.clone();
            }
            init_logging(&general)?;
            commands::config::execute(args, &cli.config, &overrides, &writer).await
        }
        Commands::Check(args) => {
            let config = load_config(&cli.config, &overrides).await?;
            init_logging(&config.general)?;
            commands::check::execute(args, &config, &writer).await
        }
        Commands::Watch(args) => {
            let config = load_config(&cli.config, &overrides).await?;
            init_logging(&config.general)?;
            commands::watch::execute(args, &config, &writer).await
        }
    }
}

fn init_logging(general: &GeneralConfig) -> Result<(), CliError> {
    logging::init_tracing(general).map_err(|e| CliError::Command(e.to_string()))
}
