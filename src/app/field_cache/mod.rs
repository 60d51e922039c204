// Field cache - Typed cache façade over the byte-oriented cache store

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{trace, warn};

use crate::ports::CacheStorePort;

/// The cached quantities, one key per file each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheField {
    /// The complete assembled record
    Information,
    Duration,
    GlobalMeta,
    Bitrate,
    Start,
    Type,
    Volume,
    VideoComponent,
    AudioComponent,
    HasAudio,
    HasVideo,
    /// The analyzer's raw transcript
    RawData,
    ContainerFormat,
}

impl CacheField {
    pub const ALL: [CacheField; 13] = [
        CacheField::Information,
        CacheField::Duration,
        CacheField::GlobalMeta,
        CacheField::Bitrate,
        CacheField::Start,
        CacheField::Type,
        CacheField::Volume,
        CacheField::VideoComponent,
        CacheField::AudioComponent,
        CacheField::HasAudio,
        CacheField::HasVideo,
        CacheField::RawData,
        CacheField::ContainerFormat,
    ];

    /// Key suffix, stable across releases so existing cache entries stay readable
    pub fn suffix(&self) -> &'static str {
        match self {
            CacheField::Information => "parsed_information",
            CacheField::Duration => "parsed_duration",
            CacheField::GlobalMeta => "parsed_global_meta",
            CacheField::Bitrate => "parsed_bitrate",
            CacheField::Start => "parsed_start",
            CacheField::Type => "parsed_type",
            CacheField::Volume => "parsed_volume",
            CacheField::VideoComponent => "parsed_video_component",
            CacheField::AudioComponent => "parsed_audio_component",
            CacheField::HasAudio => "parsed_has_audio",
            CacheField::HasVideo => "parsed_has_video",
            CacheField::RawData => "raw_data",
            CacheField::ContainerFormat => "container_format",
        }
    }
}

/// Store key for one field of one file: `<namespace>/<md5 of canonical path>_<field>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: String,
    path_hash: String,
    field: CacheField,
}

impl CacheKey {
    /// `canonical_path` must already be canonicalized; equal paths give equal keys
    pub fn new(namespace: impl Into<String>, canonical_path: &Path, field: CacheField) -> Self {
        Self {
            namespace: namespace.into(),
            path_hash: path_hash(canonical_path),
            field,
        }
    }

    pub fn field(&self) -> CacheField {
        self.field
    }

    pub fn path_hash(&self) -> &str {
        &self.path_hash
    }

    /// Same file, another field
    pub fn with_field(&self, field: CacheField) -> Self {
        Self {
            field,
            ..self.clone()
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}_{}", self.namespace, self.path_hash, self.field.suffix())
    }
}

/// Lowercase hex md5 of the path's textual form
pub fn path_hash(path: &Path) -> String {
    format!("{:x}", md5::compute(path.to_string_lossy().as_bytes()))
}

/// Typed get/set over a [`CacheStorePort`].
///
/// Values are stored as JSON, so a cached `None` (`null`) is distinct from a miss.
/// Backend and decoding failures are logged and reported as misses.
#[derive(Clone)]
pub struct FieldCache {
    store: Option<Arc<dyn CacheStorePort>>,
    namespace: String,
}

impl FieldCache {
    pub fn new(store: Arc<dyn CacheStorePort>, namespace: impl Into<String>) -> Self {
        Self {
            store: Some(store),
            namespace: namespace.into(),
        }
    }

    /// A cache that never stores anything
    pub fn disabled(namespace: impl Into<String>) -> Self {
        Self {
            store: None,
            namespace: namespace.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self, canonical_path: &Path, field: CacheField) -> CacheKey {
        CacheKey::new(self.namespace.clone(), canonical_path, field)
    }

    /// Cached value for `key`; `None` means miss
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let store = self.store.as_ref()?;
        let key_text = key.to_string();

        let bytes = match store.get(&key_text).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                trace!("Cache miss {}", key_text);
                return None;
            }
            Err(e) => {
                warn!("Cache read failed for {}, treating as miss: {}", key_text, e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                trace!("Cache hit {}", key_text);
                Some(value)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key_text, e);
                None
            }
        }
    }

    /// Store `value` under `key`; failures are logged, never returned
    pub async fn set<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let key_text = key.to_string();

        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not encode cache entry {}: {}", key_text, e);
                return;
            }
        };
        if let Err(e) = store.set(&key_text, bytes).await {
            warn!("Cache write failed for {}: {}", key_text, e);
        }
    }
}

impl fmt::Debug for FieldCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCache")
            .field("namespace", &self.namespace)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
