// Image interactor - Image-only view over the media parser

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::inspect_interactor::MediaParser;
use crate::domain::errors::*;
use crate::domain::model::*;

/// A file known to be a still image.
///
/// Opening fails with [`DomainError::NotAnImage`] unless the file classifies as
/// [`MediaKind::Image`], unless the check is waived.
pub struct ImageMedia {
    parser: Arc<MediaParser>,
    path: PathBuf,
    kind: MediaKind,
}

impl ImageMedia {
    pub async fn open(
        parser: Arc<MediaParser>,
        path: &Path,
        use_cache: bool,
        ensure_image: bool,
    ) -> Result<Self, DomainError> {
        let kind = parser.file_type(path, use_cache).await?;
        if ensure_image && kind != MediaKind::Image {
            return Err(DomainError::NotAnImage {
                path: path.display().to_string(),
                kind: kind.to_string(),
            });
        }
        Ok(Self {
            parser,
            path: path.to_path_buf(),
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Pixel dimensions of the image's video stream
    pub async fn dimensions(&self, use_cache: bool) -> Result<Option<Dimensions>, DomainError> {
        Ok(self
            .parser
            .video_component(&self.path, use_cache)
            .await?
            .and_then(|video| video.dimensions))
    }

    /// Frame rate reported for the image stream (animated formats carry a real one)
    pub async fn frame_rate(&self, use_cache: bool) -> Result<Option<f64>, DomainError> {
        Ok(self
            .parser
            .video_component(&self.path, use_cache)
            .await?
            .and_then(|video| video.frame_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockAnalyzerAdapter, StaticMimeAdapter};
    use crate::app::field_cache::FieldCache;

    const JPEG_TRANSCRIPT: &str = "\
Input #0, image2, from 'photo.jpg':
  Duration: 00:00:00.04, start: 0.000000, bitrate: 5020 kb/s
    Stream #0:0: Video: mjpeg (Baseline), yuvj420p(pc, bt470bg/unknown/unknown), 640x480 [SAR 1:1 DAR 4:3], 25 tbr, 25 tbn, 25 tbc
";

    fn parser(mime: &str) -> Arc<MediaParser> {
        Arc::new(MediaParser::new(
            Arc::new(MockAnalyzerAdapter::with_transcript(JPEG_TRANSCRIPT)),
            Arc::new(StaticMimeAdapter::new(mime)),
            FieldCache::disabled("media_parser"),
        ))
    }

    #[tokio::test]
    async fn test_open_image() {
        let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        let image = ImageMedia::open(parser("image/jpeg"), file.path(), true, true)
            .await
            .unwrap();

        assert_eq!(image.kind(), MediaKind::Image);
        let dims = image.dimensions(true).await.unwrap().unwrap();
        assert_eq!((dims.width, dims.height), (640.0, 480.0));
        assert_eq!(image.frame_rate(true).await.unwrap(), Some(25.0));
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        let result = ImageMedia::open(parser("video/mp4"), file.path(), true, true).await;
        match result {
            Err(DomainError::NotAnImage { kind, .. }) => assert_eq!(kind, "video"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("video opened as an image"),
        }
    }

    #[tokio::test]
    async fn test_check_can_be_waived() {
        let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        let image = ImageMedia::open(parser("video/mp4"), file.path(), true, false)
            .await
            .unwrap();
        assert_eq!(image.kind(), MediaKind::Video);
    }
}
