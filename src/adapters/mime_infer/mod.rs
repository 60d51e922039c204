// MIME adapter - Magic-number detection with a file-extension fallback

use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::path::PathUtils;

/// Returned when neither the content nor the extension identifies the file
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// MIME detector backed by the `infer` crate
#[derive(Debug, Default, Clone)]
pub struct InferMimeAdapter;

impl InferMimeAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Extension-based guess for formats without a reliable magic number
    pub fn guess_from_extension(path: &Path) -> Option<&'static str> {
        let ext = PathUtils::get_extension(path)?;
        let mime = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            "avif" => "image/avif",
            "heic" => "image/heic",
            "heif" => "image/heif",
            "svg" => "image/svg+xml",
            "mp3" => "audio/mpeg",
            "wav" => "audio/x-wav",
            "flac" => "audio/x-flac",
            "ogg" | "oga" => "audio/ogg",
            "m4a" => "audio/m4a",
            "aac" => "audio/aac",
            "opus" => "audio/opus",
            "mp4" | "m4v" => "video/mp4",
            "mov" => "video/quicktime",
            "mkv" => "video/x-matroska",
            "webm" => "video/webm",
            "avi" => "video/x-msvideo",
            "ts" | "mts" | "m2ts" => "video/mp2t",
            _ => return None,
        };
        Some(mime)
    }
}

#[async_trait]
impl MimePort for InferMimeAdapter {
    async fn mime_type(&self, path: &Path) -> Result<String, DomainError> {
        let owned = path.to_path_buf();
        let detected = tokio::task::spawn_blocking(move || infer::get_from_path(&owned))
            .await
            .map_err(|e| DomainError::BadArgs(format!("MIME detection task failed: {}", e)))?;

        match detected {
            Ok(Some(kind)) => Ok(kind.mime_type().to_string()),
            Ok(None) => Ok(Self::guess_from_extension(path)
                .unwrap_or(UNKNOWN_MIME)
                .to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DomainError::FileNotFound(path.display().to_string()))
            }
            Err(e) => {
                warn!("Could not read {} for MIME detection: {}", path.display(), e);
                Ok(Self::guess_from_extension(path)
                    .unwrap_or(UNKNOWN_MIME)
                    .to_string())
            }
        }
    }
}
