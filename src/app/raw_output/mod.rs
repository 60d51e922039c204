// Raw-output provider - Fetches, vets and caches the analyzer transcript

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

use crate::app::field_cache::{CacheField, CacheKey, FieldCache};
use crate::domain::errors::*;
use crate::ports::*;
use crate::probe::markers;
use crate::utils::path::PathUtils;

/// A transcript ready for extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    /// Canonical path the transcript describes
    pub path: PathBuf,
    pub text: String,
    /// Served from the cache instead of a fresh analyzer run
    pub from_cache: bool,
}

impl RawCapture {
    /// The analyzer said nothing; every derived field will be absent
    pub fn is_low_confidence(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Obtains the analyzer transcript for a file, at most one analyzer run per file at a time
pub struct RawOutputProvider {
    analyzer: Arc<dyn AnalyzerPort>,
    cache: FieldCache,
    gates: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl RawOutputProvider {
    pub fn new(analyzer: Arc<dyn AnalyzerPort>, cache: FieldCache) -> Self {
        Self {
            analyzer,
            cache,
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Transcript for `path`, which is canonicalized first
    pub async fn raw_output(&self, path: &Path, use_cache: bool) -> Result<RawCapture, DomainError> {
        let canonical = PathUtils::canonicalize(path)?;
        self.raw_output_canonical(&canonical, use_cache).await
    }

    /// Transcript for an already canonical path.
    ///
    /// The fresh transcript is written to the cache even when `use_cache` is false,
    /// so later cached calls see the newest analysis.
    pub async fn raw_output_canonical(
        &self,
        canonical: &Path,
        use_cache: bool,
    ) -> Result<RawCapture, DomainError> {
        let key = self.cache.key(canonical, CacheField::RawData);

        if use_cache {
            if let Some(text) = self.cache.get::<String>(&key).await {
                debug!("Raw output for {} served from cache", canonical.display());
                return Ok(self.capture(canonical, text, true));
            }
        }

        let gate = self.gate(canonical);
        let result = {
            let _running = gate.lock().await;

            // Another caller may have finished the analysis while this one waited
            let cached = if use_cache {
                self.cache.get::<String>(&key).await
            } else {
                None
            };
            match cached {
                Some(text) => {
                    debug!("Raw output for {} filled by concurrent caller", canonical.display());
                    Ok(self.capture(canonical, text, true))
                }
                None => self.analyze(canonical, &key).await,
            }
        };
        self.release_gate(canonical, gate);
        result
    }

    async fn analyze(&self, canonical: &Path, key: &CacheKey) -> Result<RawCapture, DomainError> {
        debug!("Running analyzer on {}", canonical.display());
        let output = self
            .analyzer
            .invoke(canonical, AnalysisMode::LoudnessNullOutput)
            .await?;

        if !output.exit_ok && !output.last_line.contains(markers::NO_OUTPUT_FILE_SPECIFIED) {
            error!(
                "Analyzer failed on {}: {}",
                canonical.display(),
                output.last_line
            );
            return Err(DomainError::SubprocessFailure {
                path: canonical.display().to_string(),
                output: output.captured,
            });
        }

        let capture = self.capture(canonical, output.captured, false);
        if capture.is_low_confidence() {
            warn!("Analyzer produced no output for {}", canonical.display());
        }
        self.cache.set(key, &capture.text).await;
        Ok(capture)
    }

    fn capture(&self, canonical: &Path, text: String, from_cache: bool) -> RawCapture {
        RawCapture {
            path: canonical.to_path_buf(),
            text,
            from_cache,
        }
    }

    fn gate(&self, canonical: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(gates.entry(canonical.to_path_buf()).or_default())
    }

    /// Forget the gate once no other caller holds it
    fn release_gate(&self, canonical: &Path, gate: Arc<tokio::sync::Mutex<()>>) {
        let mut gates = self.gates.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // One reference in the map, one here
        if Arc::strong_count(&gate) <= 2 {
            gates.remove(canonical);
        }
    }

    /// Number of files with an analysis in flight or queued
    pub fn pending(&self) -> usize {
        self.gates
            .lock()
            .map(|gates| gates.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryCacheStore, MockAnalyzerAdapter};
    use std::time::Duration;

    const TRANSCRIPT: &str = "Input #0, mp3, from 'song.mp3':\n  Duration: 00:00:05.00, start: 0.000000, bitrate: 128 kb/s\n    Stream #0:0: Audio: mp3, 44100 Hz, stereo, fltp, 128 kb/s\n";

    fn media_file() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".mp3").tempfile().unwrap()
    }

    fn provider(analyzer: MockAnalyzerAdapter) -> (RawOutputProvider, Arc<MockAnalyzerAdapter>) {
        let analyzer = Arc::new(analyzer);
        let cache = FieldCache::new(Arc::new(MemoryCacheStore::new()), "media_parser");
        (RawOutputProvider::new(analyzer.clone(), cache), analyzer)
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let file = media_file();
        let (provider, analyzer) = provider(MockAnalyzerAdapter::with_transcript(TRANSCRIPT));

        let first = provider.raw_output(file.path(), true).await.unwrap();
        let second = provider.raw_output(file.path(), true).await.unwrap();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.text, second.text);
        assert_eq!(analyzer.invocations(), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_refetches() {
        let file = media_file();
        let (provider, analyzer) = provider(MockAnalyzerAdapter::with_transcript(TRANSCRIPT));

        provider.raw_output(file.path(), false).await.unwrap();
        let again = provider.raw_output(file.path(), false).await.unwrap();
        assert!(!again.from_cache);
        assert_eq!(analyzer.invocations(), 2);

        // The refetched transcript was still stored for cached callers
        let cached = provider.raw_output(file.path(), true).await.unwrap();
        assert!(cached.from_cache);
        assert_eq!(analyzer.invocations(), 2);
    }

    #[tokio::test]
    async fn test_error_exit_is_subprocess_failure() {
        let file = media_file();
        let output = AnalyzerOutput::new("song.mp3: Invalid data found when processing input\n", false);
        let (provider, _) = provider(MockAnalyzerAdapter::with_output(output));

        let err = provider.raw_output(file.path(), true).await.unwrap_err();
        match err {
            DomainError::SubprocessFailure { output, .. } => {
                assert!(output.contains("Invalid data found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_benign_no_output_exit_is_accepted() {
        let file = media_file();
        let text = format!("{}At least one output file must be specified\n", TRANSCRIPT);
        let (provider, _) = provider(MockAnalyzerAdapter::with_output(AnalyzerOutput::new(text, false)));

        let capture = provider.raw_output(file.path(), true).await.unwrap();
        assert!(capture.text.contains("Duration:"));
    }

    #[tokio::test]
    async fn test_empty_success_is_low_confidence() {
        let file = media_file();
        let (provider, _) = provider(MockAnalyzerAdapter::with_transcript(""));

        let capture = provider.raw_output(file.path(), true).await.unwrap();
        assert!(capture.is_low_confidence());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (provider, analyzer) = provider(MockAnalyzerAdapter::with_transcript(TRANSCRIPT));
        let err = provider
            .raw_output(Path::new("/nonexistent/song.mp3"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FileNotFound(_)));
        assert_eq!(analyzer.invocations(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_analysis() {
        let file = media_file();
        let (provider, analyzer) = provider(
            MockAnalyzerAdapter::with_transcript(TRANSCRIPT).with_delay(Duration::from_millis(50)),
        );
        let provider = Arc::new(provider);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let provider = Arc::clone(&provider);
            let path = file.path().to_path_buf();
            handles.push(tokio::spawn(async move { provider.raw_output(&path, true).await }));
        }
        for handle in handles {
            let capture = handle.await.unwrap().unwrap();
            assert_eq!(capture.text, TRANSCRIPT);
        }

        assert_eq!(analyzer.invocations(), 1);
        assert_eq!(provider.pending(), 0);
    }
}
