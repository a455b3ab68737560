//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Stackpulse -- deployment health checks for a cloud application stack.
///
/// Use `stackpulse <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "stackpulse", version, about, long_about = None)]
pub struct Cli {
    /// Path to the stackpulse.toml configuration file (missing file means defaults).
    #[arg(short, long, default_value = "stackpulse.toml", global = true)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Deployment environment to check (e.g. dev, staging, prod).
    #[arg(short, long = "env", global = true)]
    pub environment: Option<String>,

    /// Cloud region.
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Public domain serving the web application.
    #[arg(short, long, global = true)]
    pub domain: Option<String>,

    /// Path to the inventory snapshot JSON.
    #[arg(long, global = true)]
    pub inventory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every health probe once and print the report.
    Check(CheckArgs),

    /// Re-run the health check on an interval until interrupted.
    Watch(WatchArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- check ----

/// Run a single health check.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Persist the report as JSON (default name `<prefix>_<env>_<timestamp>.json`).
    #[arg(short, long)]
    pub save_report: bool,

    /// Write the JSON report to this file (implies --save-report).
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Run probes one at a time in registration order.
    #[arg(long)]
    pub sequential: bool,
}

// ---- watch ----

/// Continuously refresh the health report.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Refresh interval in seconds (default: watch.refresh_secs).
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Expose Prometheus metrics while watching.
    #[arg(long)]
    pub metrics: bool,

    /// Run probes one at a time in registration order.
    #[arg(long)]
    pub sequential: bool,
}

// ---- config ----

/// Manage stackpulse configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, target, engine, naming, report, watch, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}
