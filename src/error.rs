//! Error types

use thiserror::Error;

/// Errors loading or validating a [`SimConfig`](crate::SimConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the schema
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed values that cannot describe a world
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors surfaced by world queries
#[derive(Debug, Error)]
pub enum SimError {
    /// The key does not name a live body
    #[error("unknown body")]
    UnknownBody,

    /// The index was built for a different body collection
    #[error("spatial index is stale (built for {built:?}, world is at generation {current})")]
    StaleIndex { built: Option<u64>, current: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
