//! Cache store abstraction and the bundled in-memory backend.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use tokio::time::Instant;

use super::config::CacheConfig;
use super::error::StoreError;
use super::lock::mutex_lock;

const SOURCE: &str = "cache::store";

/// Key-value store holding serialized aggregates.
///
/// Implementations must treat expired entries exactly like missing ones.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    async fn set(&self, key: &str, payload: Bytes, ttl: Duration) -> Result<(), StoreError>;
}

struct StoredEntry {
    payload: Bytes,
    expires_at: Instant,
}

/// Bounded in-process store with LRU eviction and per-entry expiry.
///
/// Expiry is measured on the tokio clock, so paused-time tests can advance
/// past a TTL deterministically.
pub struct MemoryStore {
    entries: Mutex<LruCache<String, StoredEntry>>,
}

impl MemoryStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(config.store_capacity_non_zero())),
        }
    }

    pub fn invalidate(&self, key: &str) {
        mutex_lock(&self.entries, SOURCE, "invalidate").pop(key);
    }

    pub fn invalidate_all(&self) {
        mutex_lock(&self.entries, SOURCE, "invalidate_all").clear();
    }

    /// Number of held entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        mutex_lock(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let mut entries = mutex_lock(&self.entries, SOURCE, "get");
        let fresh = entries.get(key).map(|entry| {
            (entry.expires_at > Instant::now()).then(|| entry.payload.clone())
        });
        match fresh {
            None => Ok(None),
            Some(Some(payload)) => Ok(Some(payload)),
            Some(None) => {
                entries.pop(key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, payload: Bytes, ttl: Duration) -> Result<(), StoreError> {
        let entry = StoredEntry {
            payload,
            expires_at: Instant::now() + ttl,
        };
        mutex_lock(&self.entries, SOURCE, "set").put(key.to_string(), entry);
        Ok(())
    }
}
