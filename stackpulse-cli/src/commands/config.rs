//! `stackpulse config` command handler

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use stackpulse_core::config::StackpulseConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::{Overrides, load_config};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Section names accepted by `config show --section`.
pub const SECTIONS: [&str; 7] = [
    "general", "target", "engine", "naming", "report", "watch", "metrics",
];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    overrides: &Overrides,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, overrides, writer).await,
        ConfigAction::Show { section } => {
            execute_show(config_path, overrides, section, writer).await
        }
    }
}

/// Loads and validates the configuration file, reporting any errors.
///
/// Unlike `check`, a missing file is an error here.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (missing file, parse errors, invalid values).
async fn execute_validate(
    config_path: &Path,
    overrides: &Overrides,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validation_report(config_path, validate_file(config_path, overrides).await);
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

async fn validate_file(config_path: &Path, overrides: &Overrides) -> Result<(), CliError> {
    let mut config = StackpulseConfig::from_file(config_path).await?;
    config.apply_env_overrides();
    overrides.apply(&mut config);
    config.validate()?;
    Ok(())
}

fn validation_report(config_path: &Path, result: Result<(), CliError>) -> ConfigValidationReport {
    let source = config_path.display().to_string();
    match result {
        Ok(()) => ConfigValidationReport {
            source,
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source,
            valid: false,
            errors: vec![e.to_string()],
        },
    }
}

/// Displays the effective configuration (file + env overrides + CLI flags + defaults).
///
/// # Errors
///
/// Returns a config error if loading fails or `CliError::Command` if the section name is unknown.
async fn execute_show(
    config_path: &Path,
    overrides: &Overrides,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = load_config(config_path, overrides).await?;
    let report = config_report(&config, config_path, section)?;
    writer.render(&report)?;
    Ok(())
}

/// Builds the `config show` payload for the whole config or one section.
pub fn config_report(
    config: &StackpulseConfig,
    config_path: &Path,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let (config_toml, value) = match section.as_deref() {
        None => serialize(config)?,
        Some("general") => serialize(&config.general)?,
        Some("target") => serialize(&config.target)?,
        Some("engine") => serialize(&config.engine)?,
        Some("naming") => serialize(&config.naming)?,
        Some("report") => serialize(&config.report)?,
        Some("watch") => serialize(&config.watch)?,
        Some("metrics") => serialize(&config.metrics)?,
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    };

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config: value,
        config_toml,
    })
}

fn serialize<T: Serialize>(value: &T) -> Result<(String, serde_json::Value), CliError> {
    let toml = toml::to_string_pretty(value)
        .map_err(|e| CliError::Command(format!("failed to serialize config: {e}")))?;
    Ok((toml, serde_json::to_value(value)?))
}

/// Configuration display report.
///
/// Text output shows the TOML form; JSON output carries the same values as a JSON object.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Effective values
    pub config: serde_json::Value,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
