//! FFmpeg analyzer adapter
//!
//! Runs the `ffmpeg` binary against a file with the loudness detector and a null
//! sink, and hands back everything it printed.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::domain::errors::*;
use crate::ports::*;

/// FFmpeg-based analyzer adapter
pub struct FfmpegAnalyzerAdapter {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegAnalyzerAdapter {
    /// Create a new adapter invoking `binary` (a bare name is looked up on `PATH`)
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kill the subprocess if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, path: &Path, mode: AnalysisMode) -> Command {
        let mut command = Command::new(&self.binary);
        command.args(["-hide_banner", "-nostdin", "-nostats", "-i"]).arg(path);
        match mode {
            AnalysisMode::LoudnessNullOutput => {
                command.args(["-af", "volumedetect", "-f", "null", "-"]);
            }
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl Default for FfmpegAnalyzerAdapter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AnalyzerPort for FfmpegAnalyzerAdapter {
    #[instrument(skip(self), fields(binary = %self.binary.display()))]
    async fn invoke(&self, path: &Path, mode: AnalysisMode) -> Result<AnalyzerOutput, DomainError> {
        let child = self.command(path, mode).spawn().map_err(|e| {
            DomainError::SpawnFailed(format!("{}: {}", self.binary.display(), e))
        })?;

        let waiting = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, waiting).await.map_err(|_| {
                DomainError::Timeout(format!(
                    "{} did not finish within {}s",
                    path.display(),
                    limit.as_secs_f64()
                ))
            })?,
            None => waiting.await,
        }
        .map_err(|e| DomainError::SpawnFailed(format!("Failed to collect analyzer output: {}", e)))?;

        // ffmpeg writes its report to stderr; stdout is normally empty with a null sink
        let mut captured = String::from_utf8_lossy(&output.stderr).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stdout));

        debug!(
            status = ?output.status.code(),
            bytes = captured.len(),
            "Analyzer finished"
        );

        Ok(AnalyzerOutput::new(captured, output.status.success()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_arguments() {
        let adapter = FfmpegAnalyzerAdapter::new("/opt/ffmpeg/bin/ffmpeg");
        let command = adapter.command(Path::new("/media/clip.mp4"), AnalysisMode::LoudnessNullOutput);
        let std_command = command.as_std();

        assert_eq!(std_command.get_program(), "/opt/ffmpeg/bin/ffmpeg");
        let args: Vec<_> = std_command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-nostdin",
                "-nostats",
                "-i",
                "/media/clip.mp4",
                "-af",
                "volumedetect",
                "-f",
                "null",
                "-"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_failure() {
        let adapter = FfmpegAnalyzerAdapter::new("/nonexistent/definitely-not-ffmpeg");
        let result = adapter
            .invoke(Path::new("clip.mp4"), AnalysisMode::LoudnessNullOutput)
            .await;
        assert!(matches!(result, Err(DomainError::SpawnFailed(_))));
    }
}
