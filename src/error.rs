//! Error types for the engine.
//!
//! Everything here is raised before a search starts. A search that runs out
//! of time is not an error: the driver falls back to its last completed depth.

use std::io;
use thiserror::Error;

/// A search configuration that cannot be honoured.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max_depth must be at least 1")]
    ZeroDepth,

    #[error("max_time_seconds must be a positive finite number, got {seconds}")]
    InvalidTimeLimit { seconds: f64 },

    #[error("transposition_table_capacity must be at least 1")]
    ZeroTableCapacity,

    #[error("mcts_simulations must be at least 1")]
    ZeroSimulations,

    #[error("soft_time_ratio must lie in (0, 1], got {ratio}")]
    InvalidSoftRatio { ratio: f64 },
}

/// A position description that could not be turned into a playable position.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Illegal position '{fen}': {reason}")]
    IllegalSetup { fen: String, reason: String },
}

/// Errors surfaced by the public engine entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error("Illegal move '{uci}' in position {fen}")]
    IllegalMove { uci: String, fen: String },
}

/// Failures while reading or writing a saved configuration profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profile I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed profile: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Profile '{name}' is invalid: {source}")]
    Invalid { name: String, source: ConfigError },
}

pub type EngineResult<T> = Result<T, EngineError>;
