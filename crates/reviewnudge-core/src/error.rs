//! Core error types for reviewnudge-core.
//!
//! Configuration problems met while *loading* never surface as errors: the
//! lenient loader substitutes defaults and logs instead. These types cover the
//! explicit paths (saving, `config set`, host calls) where the caller must know.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for reviewnudge-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Host collaborator errors
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a configuration field
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Errors raised by the host application collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The wall clock could not be read
    #[error("clock unavailable: {0}")]
    ClockUnavailable(String),

    /// The host's activity state could not be read
    #[error("host state unavailable: {0}")]
    StateUnavailable(String),

    /// The host could not open a review session
    #[error("could not start review: {0}")]
    ReviewStartFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
