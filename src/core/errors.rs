use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;

/// Unified error type for the domain, storage and admin layers.
#[derive(Error, Debug)]
pub enum DairyError {
    #[error("No dairy center assigned")]
    NoDairyCenter,
    #[error("Farmer not found: {0}")]
    FarmerNotFound(String),
    #[error("Dairy center not found: {0}")]
    CenterNotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, DairyError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] DairyError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for DairyError {
    fn from(err: std::io::Error) -> Self {
        DairyError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for DairyError {
    fn from(err: serde_json::Error) -> Self {
        DairyError::StorageError(err.to_string())
    }
}

impl From<ConfigError> for DairyError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => DairyError::StorageError(io.to_string()),
            ConfigError::Serde(message) => DairyError::ConfigError(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(DairyError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}
