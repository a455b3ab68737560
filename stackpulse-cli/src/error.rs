//! CLI-specific error types and exit code mapping

use stackpulse_core::error::{ConfigError, StackpulseError};
use stackpulse_probes::{HttpError, InventoryError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The health check completed and the verdict is ERROR.
    #[error("platform unhealthy: {0}")]
    Unhealthy(String),

    /// The inventory snapshot could not be loaded.
    #[error("{0}")]
    Inventory(#[from] InventoryError),

    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    Http(#[from] HttpError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file write, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from stackpulse-core.
    #[error("{0}")]
    Core(#[from] StackpulseError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error              |
    /// | 2    | Configuration error                  |
    /// | 4    | Platform unhealthy (verdict ERROR)   |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(StackpulseError::Config(_)) => 2,
            Self::Unhealthy(_) => 4,
            Self::Io(_) | Self::Inventory(_) | Self::Core(StackpulseError::Io(_)) => 10,
            Self::Command(_) | Self::Http(_) | Self::JsonSerialize(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Core(StackpulseError::Config(e))
    }
}
