//! CLI command implementations for Harvester.

pub(crate) mod act;
pub(crate) mod dwell;
pub(crate) mod params;
pub(crate) mod replay;

mod output;

use clap::ValueEnum;
use harvester::{ConfigError, EngineError, GameConfig, Params};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<harvester::replay::ReplayError> for CliError {
    fn from(e: harvester::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the game configuration, or the standard one when no file is given.
fn load_config(path: Option<&Path>) -> Result<GameConfig, CliError> {
    Ok(match path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    })
}

/// Load parameter overrides, or the defaults when no file is given.
fn load_params(path: Option<&Path>) -> Result<Params, CliError> {
    Ok(match path {
        Some(path) => Params::load(path)?,
        None => Params::default(),
    })
}
