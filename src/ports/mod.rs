// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use async_trait::async_trait;
use std::path::Path;

/// Analysis request sent to the raw-output collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Run the loudness detector and discard the decoded output
    LoudnessNullOutput,
}

/// What the analyzer printed and how it exited
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalyzerOutput {
    /// Combined diagnostic text
    pub captured: String,
    /// Process exited with status zero
    pub exit_ok: bool,
    /// Last non-empty line of `captured`
    pub last_line: String,
}

impl AnalyzerOutput {
    /// Build an output, deriving `last_line` from the captured text
    pub fn new(captured: impl Into<String>, exit_ok: bool) -> Self {
        let captured = captured.into();
        let last_line = captured
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();
        Self {
            captured,
            exit_ok,
            last_line,
        }
    }
}

/// Port for the media-analysis subprocess
#[async_trait]
pub trait AnalyzerPort: Send + Sync {
    /// Analyze `path` and return everything the tool printed.
    ///
    /// An error exit is NOT an `Err` here; the caller decides whether it is benign.
    async fn invoke(&self, path: &Path, mode: AnalysisMode) -> Result<AnalyzerOutput, DomainError>;
}

/// Port for MIME type detection
#[async_trait]
pub trait MimePort: Send + Sync {
    /// MIME type of the file at `path`, e.g. `image/jpeg`
    async fn mime_type(&self, path: &Path) -> Result<String, DomainError>;
}

/// Port for the byte-oriented cache backend
#[async_trait]
pub trait CacheStorePort: Send + Sync {
    /// Stored bytes for `key`, `None` on a miss
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError>;

    /// Store bytes under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_line_skips_trailing_blank_lines() {
        let output = AnalyzerOutput::new("line one\nAt least one output file must be specified\n\n", false);
        assert_eq!(output.last_line, "At least one output file must be specified");
        assert!(!output.exit_ok);
    }

    #[test]
    fn test_empty_capture() {
        let output = AnalyzerOutput::new("", true);
        assert_eq!(output.last_line, "");
    }
}
