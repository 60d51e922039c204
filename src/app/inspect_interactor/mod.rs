// Inspect interactor - Media parser aggregating every field extractor

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::app::field_cache::{CacheField, FieldCache};
use crate::app::raw_output::{RawCapture, RawOutputProvider};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::MediaClassifier;
use crate::ports::*;
use crate::probe;
use crate::utils::path::PathUtils;

/// Query surface keyed by file path.
///
/// Every field is cached on its own; `get_file_information` additionally caches the
/// assembled record so a repeat call skips extraction entirely.
pub struct MediaParser {
    raw: RawOutputProvider,
    mime_port: Arc<dyn MimePort>,
    cache: FieldCache,
}

impl MediaParser {
    /// Create new media parser with injected ports
    pub fn new(analyzer_port: Arc<dyn AnalyzerPort>, mime_port: Arc<dyn MimePort>, cache: FieldCache) -> Self {
        Self {
            raw: RawOutputProvider::new(analyzer_port, cache.clone()),
            mime_port,
            cache,
        }
    }

    pub fn cache(&self) -> &FieldCache {
        &self.cache
    }

    /// Complete record for `path`
    pub async fn get_file_information(&self, path: &Path, use_cache: bool) -> Result<MediaInformation, DomainError> {
        let canonical = PathUtils::canonicalize(path)?;
        let key = self.cache.key(&canonical, CacheField::Information);

        if use_cache {
            if let Some(mut cached) = self.cache.get::<MediaInformation>(&key).await {
                debug!("Record for {} served from cache", canonical.display());
                cached.from_cache = true;
                return Ok(cached);
            }
        }

        let raw = self.raw.raw_output_canonical(&canonical, use_cache).await?;
        let information = self.assemble(&canonical, &raw, use_cache).await;
        self.cache.set(&key, &information).await;

        info!(
            "Extracted {} ({}, container {})",
            canonical.display(),
            information.kind,
            if information.container.is_empty() { "unknown" } else { information.container.as_str() }
        );
        Ok(information)
    }

    async fn assemble(&self, canonical: &Path, raw: &RawCapture, use_cache: bool) -> MediaInformation {
        let text = raw.text.as_str();

        let kind = self.cached_kind(canonical, text, use_cache).await;
        let container = self
            .cached(canonical, CacheField::ContainerFormat, use_cache, || probe::container(text))
            .await;
        let duration = self
            .cached(canonical, CacheField::Duration, use_cache, || probe::duration(text))
            .await;
        let bitrate = self
            .cached(canonical, CacheField::Bitrate, use_cache, || probe::bitrate(text))
            .await;
        let start = self
            .cached(canonical, CacheField::Start, use_cache, || probe::start(text))
            .await;
        let volume = self
            .cached(canonical, CacheField::Volume, use_cache, || probe::volume(text))
            .await;
        let global_metadata = self
            .cached(canonical, CacheField::GlobalMeta, use_cache, || probe::global_metadata(text))
            .await;
        let video = self
            .cached(canonical, CacheField::VideoComponent, use_cache, || probe::video_stream(text))
            .await;
        let audio = self
            .cached(canonical, CacheField::AudioComponent, use_cache, || probe::audio_stream(text))
            .await;

        // A kind without any stream descriptor to back it is not trustworthy
        let kind = if video.is_none() && audio.is_none() && kind != MediaKind::Unknown {
            warn!("{} classified as {} but no stream could be parsed", canonical.display(), kind);
            MediaKind::Unknown
        } else {
            kind
        };

        MediaInformation {
            path: canonical.to_path_buf(),
            kind,
            container,
            duration,
            bitrate,
            start,
            volume,
            video,
            audio,
            global_metadata,
            read_at: Utc::now(),
            low_confidence: raw.is_low_confidence(),
            from_cache: false,
        }
    }

    /// Cached value of one field, or `extract` applied to the transcript (and cached)
    async fn cached<T, F>(&self, canonical: &Path, field: CacheField, use_cache: bool, extract: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let key = self.cache.key(canonical, field);
        if use_cache {
            if let Some(value) = self.cache.get::<T>(&key).await {
                return value;
            }
        }
        let value = extract();
        self.cache.set(&key, &value).await;
        value
    }

    async fn cached_kind(&self, canonical: &Path, text: &str, use_cache: bool) -> MediaKind {
        let key = self.cache.key(canonical, CacheField::Type);
        if use_cache {
            if let Some(kind) = self.cache.get::<MediaKind>(&key).await {
                return kind;
            }
        }
        let kind = self.classify(canonical, text).await;
        self.cache.set(&key, &kind).await;
        kind
    }

    async fn classify(&self, canonical: &Path, text: &str) -> MediaKind {
        let has_video_line = probe::has_video_stream_line(text);
        let has_audio_line = probe::has_audio_stream_line(text);

        // MIME only matters as a tie-break for video-looking streams
        let mime = if has_video_line {
            match self.mime_port.mime_type(canonical).await {
                Ok(mime) => Some(mime),
                Err(e) => {
                    warn!("MIME detection failed for {}: {}", canonical.display(), e);
                    None
                }
            }
        } else {
            None
        };
        MediaClassifier::classify(has_video_line, has_audio_line, mime.as_deref())
    }

    /// Run a single-field query: canonicalize, consult the field cache, else extract
    async fn field<T, F>(&self, path: &Path, field: CacheField, use_cache: bool, extract: F) -> Result<T, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&str) -> T,
    {
        let canonical = PathUtils::canonicalize(path)?;
        let key = self.cache.key(&canonical, field);
        if use_cache {
            if let Some(value) = self.cache.get::<T>(&key).await {
                return Ok(value);
            }
        }
        let raw = self.raw.raw_output_canonical(&canonical, use_cache).await?;
        let value = extract(&raw.text);
        self.cache.set(&key, &value).await;
        Ok(value)
    }

    /// The analyzer transcript itself
    pub async fn raw_information(&self, path: &Path, use_cache: bool) -> Result<String, DomainError> {
        Ok(self.raw.raw_output(path, use_cache).await?.text)
    }

    pub async fn file_type(&self, path: &Path, use_cache: bool) -> Result<MediaKind, DomainError> {
        let canonical = PathUtils::canonicalize(path)?;
        let key = self.cache.key(&canonical, CacheField::Type);
        if use_cache {
            if let Some(kind) = self.cache.get::<MediaKind>(&key).await {
                return Ok(kind);
            }
        }
        let raw = self.raw.raw_output_canonical(&canonical, use_cache).await?;
        let kind = self.classify(&canonical, &raw.text).await;
        self.cache.set(&key, &kind).await;
        Ok(kind)
    }

    /// Demuxer name, empty when undetermined
    pub async fn container_format(&self, path: &Path, use_cache: bool) -> Result<String, DomainError> {
        self.field(path, CacheField::ContainerFormat, use_cache, probe::container).await
    }

    pub async fn duration(&self, path: &Path, use_cache: bool) -> Result<Option<Timecode>, DomainError> {
        self.field(path, CacheField::Duration, use_cache, probe::duration).await
    }

    pub async fn bitrate(&self, path: &Path, use_cache: bool) -> Result<Option<Bitrate>, DomainError> {
        self.field(path, CacheField::Bitrate, use_cache, probe::bitrate).await
    }

    pub async fn start(&self, path: &Path, use_cache: bool) -> Result<Option<Timecode>, DomainError> {
        self.field(path, CacheField::Start, use_cache, probe::start).await
    }

    pub async fn volume(&self, path: &Path, use_cache: bool) -> Result<Option<Volume>, DomainError> {
        self.field(path, CacheField::Volume, use_cache, probe::volume).await
    }

    pub async fn global_metadata(&self, path: &Path, use_cache: bool) -> Result<MetadataMap, DomainError> {
        self.field(path, CacheField::GlobalMeta, use_cache, probe::global_metadata).await
    }

    pub async fn video_component(
        &self,
        path: &Path,
        use_cache: bool,
    ) -> Result<Option<VideoStreamDescriptor>, DomainError> {
        self.field(path, CacheField::VideoComponent, use_cache, probe::video_stream).await
    }

    pub async fn audio_component(
        &self,
        path: &Path,
        use_cache: bool,
    ) -> Result<Option<AudioStreamDescriptor>, DomainError> {
        self.field(path, CacheField::AudioComponent, use_cache, probe::audio_stream).await
    }

    /// Cheap presence test, independent of the audio descriptor parse
    pub async fn has_audio(&self, path: &Path, use_cache: bool) -> Result<bool, DomainError> {
        self.field(path, CacheField::HasAudio, use_cache, probe::has_audio).await
    }

    /// Cheap presence test, independent of the video descriptor parse
    pub async fn has_video(&self, path: &Path, use_cache: bool) -> Result<bool, DomainError> {
        self.field(path, CacheField::HasVideo, use_cache, probe::has_video).await
    }

    /// Canonical form of `path` as used in cache keys
    pub fn canonical_path(&self, path: &Path) -> Result<PathBuf, DomainError> {
        PathUtils::canonicalize(path)
    }
}
