use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use stackpulse_cli::cli::Cli;
use stackpulse_cli::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match stackpulse_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // the report already explains an unhealthy verdict
            if !matches!(e, CliError::Unhealthy(_)) {
                eprintln!("{} {}", "error:".red().bold(), e);
            }
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
