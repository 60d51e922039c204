use std::sync::Arc;

use tracing::debug;

use crate::adapters::{
    CacheBackend, FfmpegAnalyzerAdapter, FsCacheStore, InferMimeAdapter, MemoryCacheStore,
    ProbeConfig, TieredCacheStore,
};
use crate::app::field_cache::FieldCache;
use crate::app::image_interactor::ImageMedia;
use crate::app::inspect_interactor::MediaParser;
use crate::domain::errors::DomainError;
use crate::ports::{AnalyzerPort, CacheStorePort, MimePort};

pub trait AppContainer: Send + Sync {
    fn media_parser(&self) -> Arc<MediaParser>;
    /// Whether queries should consult the cache
    fn use_cache(&self) -> bool;
}

pub struct DefaultAppContainer {
    media_parser: Arc<MediaParser>,
    use_cache: bool,
}

impl DefaultAppContainer {
    /// Wire the production adapters described by `config`
    pub fn from_config(config: &ProbeConfig) -> Result<Self, DomainError> {
        let analyzer_port = Arc::new(
            FfmpegAnalyzerAdapter::new(config.mediaprobe.ffmpeg_path.clone())
                .with_timeout(config.mediaprobe.timeout()),
        );
        let mime_port = Arc::new(InferMimeAdapter::new());
        let cache = Self::field_cache(config)?;

        Ok(Self::with_ports(
            analyzer_port as Arc<dyn AnalyzerPort>,
            mime_port as Arc<dyn MimePort>,
            cache,
            config.cache.enabled,
        ))
    }

    /// Wire explicit ports, e.g. test doubles
    pub fn with_ports(
        analyzer_port: Arc<dyn AnalyzerPort>,
        mime_port: Arc<dyn MimePort>,
        cache: FieldCache,
        use_cache: bool,
    ) -> Self {
        Self {
            media_parser: Arc::new(MediaParser::new(analyzer_port, mime_port, cache)),
            use_cache,
        }
    }

    fn field_cache(config: &ProbeConfig) -> Result<FieldCache, DomainError> {
        let namespace = config.cache.namespace.clone();
        let store: Arc<dyn CacheStorePort> = match config.cache.backend {
            CacheBackend::Memory => Arc::new(MemoryCacheStore::new()),
            CacheBackend::Filesystem => {
                let root = config
                    .cache
                    .directory
                    .clone()
                    .or_else(FsCacheStore::default_root)
                    .ok_or_else(|| {
                        DomainError::Config("No cache directory configured and no platform default".to_string())
                    })?;
                debug!("Filesystem cache at {}", root.display());
                Arc::new(TieredCacheStore::new(Arc::new(FsCacheStore::new(root))))
            }
        };
        Ok(FieldCache::new(store, namespace))
    }

    /// Open `path` as an image through the shared parser
    pub async fn open_image(&self, path: &std::path::Path, ensure_image: bool) -> Result<ImageMedia, DomainError> {
        ImageMedia::open(self.media_parser(), path, self.use_cache, ensure_image).await
    }
}

impl AppContainer for DefaultAppContainer {
    fn media_parser(&self) -> Arc<MediaParser> {
        Arc::clone(&self.media_parser)
    }

    fn use_cache(&self) -> bool {
        self.use_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::toml_config::CacheSettings;

    #[test]
    fn test_memory_backend_wiring() {
        let config = ProbeConfig {
            cache: CacheSettings {
                backend: CacheBackend::Memory,
                ..CacheSettings::default()
            },
            ..ProbeConfig::default()
        };
        let container = DefaultAppContainer::from_config(&config).unwrap();
        assert!(container.use_cache());
        assert!(container.media_parser().cache().is_enabled());
        assert_eq!(container.media_parser().cache().namespace(), "media_parser");
    }

    #[test]
    fn test_filesystem_backend_uses_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ProbeConfig::default();
        config.cache.directory = Some(dir.path().to_path_buf());
        config.cache.enabled = false;

        let container = DefaultAppContainer::from_config(&config).unwrap();
        assert!(!container.use_cache());
    }
}
