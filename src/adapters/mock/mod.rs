//! Scripted adapters for tests and offline use

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::errors::*;
use crate::ports::*;

/// Analyzer replaying canned transcripts and counting invocations
#[derive(Debug, Clone, Default)]
pub struct MockAnalyzerAdapter {
    responses: Arc<RwLock<HashMap<PathBuf, AnalyzerOutput>>>,
    fallback: Option<AnalyzerOutput>,
    invocations: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockAnalyzerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every path with the same successful transcript
    pub fn with_transcript(captured: impl Into<String>) -> Self {
        Self {
            fallback: Some(AnalyzerOutput::new(captured, true)),
            ..Self::default()
        }
    }

    /// Answer every path with `output`
    pub fn with_output(output: AnalyzerOutput) -> Self {
        Self {
            fallback: Some(output),
            ..Self::default()
        }
    }

    /// Answer one specific path
    pub fn respond(self, path: impl Into<PathBuf>, output: AnalyzerOutput) -> Self {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(path.into(), output);
        }
        self
    }

    /// Sleep before answering, to widen race windows in concurrency tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `invoke` ran
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyzerPort for MockAnalyzerAdapter {
    async fn invoke(&self, path: &Path, _mode: AnalysisMode) -> Result<AnalyzerOutput, DomainError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .responses
            .read()
            .ok()
            .and_then(|responses| responses.get(path).cloned());
        scripted
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| DomainError::SpawnFailed(format!("no scripted output for {}", path.display())))
    }
}

/// MIME collaborator that reports a fixed type for every path
#[derive(Debug, Clone)]
pub struct StaticMimeAdapter {
    mime: String,
}

impl StaticMimeAdapter {
    pub fn new(mime: impl Into<String>) -> Self {
        Self { mime: mime.into() }
    }
}

#[async_trait]
impl MimePort for StaticMimeAdapter {
    async fn mime_type(&self, _path: &Path) -> Result<String, DomainError> {
        Ok(self.mime.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_paths_and_counter() {
        let mock = MockAnalyzerAdapter::with_transcript("fallback")
            .respond("/a.mp4", AnalyzerOutput::new("specific", false));

        let a = mock.invoke(Path::new("/a.mp4"), AnalysisMode::LoudnessNullOutput).await.unwrap();
        let b = mock.invoke(Path::new("/b.mp4"), AnalysisMode::LoudnessNullOutput).await.unwrap();

        assert_eq!(a.captured, "specific");
        assert!(!a.exit_ok);
        assert_eq!(b.captured, "fallback");
        assert_eq!(mock.invocations(), 2);
    }

    #[tokio::test]
    async fn test_unscripted_path_fails() {
        let mock = MockAnalyzerAdapter::new();
        let result = mock.invoke(Path::new("/x"), AnalysisMode::LoudnessNullOutput).await;
        assert!(result.is_err());
    }
}
