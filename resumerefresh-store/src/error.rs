//! Store error types.

use std::path::PathBuf;

use resumerefresh_core::RefreshError;
use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration file {}: {source}", path.display())]
    InvalidFile {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },

    /// An environment variable holds a value of the wrong type.
    #[error("Invalid value for {var}: `{value}` ({reason})")]
    InvalidEnv {
        /// Variable name.
        var: String,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },

    /// A required setting is missing or blank.
    #[error("Missing setting {setting} (set it in the config file or via {env})")]
    Missing {
        /// Dotted setting name.
        setting: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },

    /// Refusing to overwrite an existing file.
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<StoreError> for RefreshError {
    fn from(err: StoreError) -> Self {
        RefreshError::config(err.to_string())
    }
}
