//! Command handlers -- one module per subcommand

pub mod check;
pub mod config;
pub mod watch;

use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use stackpulse_core::config::StackpulseConfig;

use crate::cli::Cli;
use crate::error::CliError;

/// Values given on the command line, applied on top of file and env settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub environment: Option<String>,
    pub region: Option<String>,
    pub domain: Option<String>,
    pub inventory: Option<PathBuf>,
}

impl Overrides {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            log_level: cli.log_level.clone(),
            environment: cli.environment.clone(),
            region: cli.region.clone(),
            domain: cli.domain.clone(),
            inventory: cli.inventory.clone(),
        }
    }

    pub fn apply(&self, config: &mut StackpulseConfig) {
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(env) = &self.environment {
            config.target.environment = env.clone();
        }
        if let Some(region) = &self.region {
            config.target.region = region.clone();
        }
        if let Some(domain) = &self.domain {
            config.target.domain = domain.clone();
        }
        if let Some(path) = &self.inventory {
            config.target.inventory_path = path.display().to_string();
        }
    }
}

/// Loads the effective configuration: file (or defaults), env vars, then CLI flags.
pub async fn load_config(path: &Path, overrides: &Overrides) -> Result<StackpulseConfig, CliError> {
    let mut config = StackpulseConfig::load_or_default(path).await?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Cancels `token` on the first Ctrl-C.
pub(crate) fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, cancelling run");
                token.cancel();
            }
            Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
        }
    })
}
