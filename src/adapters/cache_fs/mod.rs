// Filesystem cache store - one file per key under a cache directory

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Distinguishes staging files of concurrent writes within one process
static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Persistent cache store writing each entry to its own file.
///
/// A key such as `media_parser/<hash>_duration` maps to
/// `<root>/media_parser/<hash>_duration.json`; every `/`-separated component is
/// reduced to a safe filename.
#[derive(Debug, Clone)]
pub struct FsCacheStore {
    root: PathBuf,
}

impl FsCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform cache directory, e.g. `~/.cache/mediaprobe` on Linux
    pub fn default_root() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mediaprobe").map(|dirs| dirs.cache_dir().to_path_buf())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        let components: Vec<String> = key
            .split('/')
            .filter(|component| !component.is_empty())
            .map(sanitize_component)
            .collect();
        match components.split_last() {
            Some((file, dirs)) => {
                for dir in dirs {
                    path.push(dir);
                }
                path.push(format!("{}.json", file));
            }
            None => path.push("_.json"),
        }
        path
    }
}

/// Keep `[A-Za-z0-9_.-]`, replace everything else; never yield `.` or `..`
fn sanitize_component(component: &str) -> String {
    let cleaned: String = component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}

#[async_trait]
impl CacheStorePort for FsCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let path = self.entry_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::CacheUnavailable(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::CacheUnavailable(format!(
                    "Failed to create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        // Write beside the target and rename so readers never see a partial entry
        let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
        let staging = path.with_extension(format!("json.{}.{}.tmp", std::process::id(), seq));
        tokio::fs::write(&staging, &value).await.map_err(|e| {
            DomainError::CacheUnavailable(format!("Failed to write {}: {}", staging.display(), e))
        })?;
        tokio::fs::rename(&staging, &path).await.map_err(|e| {
            DomainError::CacheUnavailable(format!("Failed to move {} into place: {}", path.display(), e))
        })?;

        debug!("Cached {} bytes at {}", value.len(), path.display());
        Ok(())
    }
}
