// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The analysis subprocess exited in error without the benign "no output" message
    SubprocessFailure { path: String, output: String },
    /// The analysis subprocess could not be started
    SpawnFailed(String),
    /// The analysis subprocess did not finish in time
    Timeout(String),
    /// File not found
    FileNotFound(String),
    /// Text could not be read as a timecode
    InvalidTimecode(String),
    /// Cache backend failure
    CacheUnavailable(String),
    /// The image decorator was used on something that is not an image
    NotAnImage { path: String, kind: String },
    /// Invalid arguments provided
    BadArgs(String),
    /// Invalid configuration
    Config(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::SubprocessFailure { path, output } => write!(
                f,
                "FFmpeg encountered an error when attempting to read `{}`. FFmpeg reported:\n{}",
                path, output
            ),
            DomainError::SpawnFailed(msg) => write!(f, "Failed to start analyzer: {}", msg),
            DomainError::Timeout(msg) => write!(f, "Analyzer timed out: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::InvalidTimecode(msg) => write!(f, "Invalid timecode: {}", msg),
            DomainError::CacheUnavailable(msg) => write!(f, "Cache unavailable: {}", msg),
            DomainError::NotAnImage { path, kind } => write!(
                f,
                "`{}` is not an image file, it is reported to be {}",
                path, kind
            ),
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
