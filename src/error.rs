//! Error types for engine construction and configuration loading.
//!
//! The per-turn path never returns these: once an [`Engine`](crate::Engine)
//! exists, every degraded condition turns into a safe default action.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid static game configuration or parameter file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Board size outside the supported range.
    #[error("board size {0} is outside 1..={max}", max = crate::game::MAX_BOARD_SIZE)]
    BoardSize(usize),
    /// Game length of zero turns.
    #[error("episode must last at least one turn")]
    NoTurns,
    /// A cost or rate that is negative or not finite.
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidValue {
        /// Field name as it appears in the host configuration.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Parameter file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Parameter file is not valid JSON for the parameter table.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Error constructing an engine or decoding host input.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Observation or configuration JSON could not be decoded.
    #[error("invalid host message: {0}")]
    Decode(#[from] serde_json::Error),
    /// I/O failure on the host channel.
    #[error("host channel: {0}")]
    Io(#[from] io::Error),
}
