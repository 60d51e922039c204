// In-process cache stores - memo layer and tiered front for a persistent store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::ports::*;

/// Cache store living for the lifetime of the process
#[derive(Debug, Default, Clone)]
pub struct MemoryCacheStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn poisoned() -> DomainError {
        DomainError::CacheUnavailable("in-memory cache lock poisoned".to_string())
    }
}

#[async_trait]
impl CacheStorePort for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// In-process memo layer in front of a persistent store.
///
/// Reads fall through to the backing store and are memoized on the way back.
/// Writes go to both layers; a failing backing store only costs persistence.
pub struct TieredCacheStore {
    front: MemoryCacheStore,
    back: Arc<dyn CacheStorePort>,
}

impl TieredCacheStore {
    pub fn new(back: Arc<dyn CacheStorePort>) -> Self {
        Self {
            front: MemoryCacheStore::new(),
            back,
        }
    }

    /// The memo layer, mostly useful for inspection in tests
    pub fn front(&self) -> &MemoryCacheStore {
        &self.front
    }
}

#[async_trait]
impl CacheStorePort for TieredCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        if let Some(value) = self.front.get(key).await? {
            return Ok(Some(value));
        }

        let value = self.back.get(key).await?;
        if let Some(value) = &value {
            debug!("Promoting {} into memo layer", key);
            self.front.set(key, value.clone()).await?;
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        self.front.set(key, value.clone()).await?;
        if let Err(e) = self.back.set(key, value).await {
            warn!("Backing cache rejected {}: {}", key, e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryCacheStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", b"1".to_vec()).await.unwrap();
        store.set("a", b"2".to_vec()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_tiered_store_promotes_backing_hits() {
        let back = Arc::new(MemoryCacheStore::new());
        back.set("k", b"v".to_vec()).await.unwrap();

        let tiered = TieredCacheStore::new(back.clone());
        assert!(tiered.front().is_empty());

        assert_eq!(tiered.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(tiered.front().keys(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_tiered_store_writes_through() {
        let back = Arc::new(MemoryCacheStore::new());
        let tiered = TieredCacheStore::new(back.clone());

        tiered.set("k", b"v".to_vec()).await.unwrap();
        assert_eq!(back.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(tiered.front().len(), 1);
    }
}
