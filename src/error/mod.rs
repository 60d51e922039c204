//! Error handling module for MediaProbe

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for configuration loading and command execution
#[derive(Error, Debug)]
pub enum MediaProbeError {
    /// Extraction or collaborator failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for this tool
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration values are out of range
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    /// Report rendering failed
    #[error("Failed to render report: {message}")]
    Render { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for MediaProbe operations
pub type MediaProbeResult<T> = std::result::Result<T, MediaProbeError>;
