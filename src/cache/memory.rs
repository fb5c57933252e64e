//! In-process cache: bounded LRU whose entries expire after their TTL.

use std::{
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use lru::LruCache;
use tokio::time::Instant;
use tracing::warn;

use super::store::{CacheError, CacheStore};

struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// Expired entries are dropped lazily on read or pushed out by LRU eviction.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of stored entries, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.lock("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries are replaced whole, never mutated in place, so a poisoned
    /// lock still guards consistent data.
    fn lock(&self, op: &'static str) -> MutexGuard<'_, LruCache<String, MemoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!(
                target = "quill::cache",
                op,
                result = "poisoned_recovered",
                "Recovered from poisoned memory cache lock"
            );
            poisoned.into_inner()
        })
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        let mut entries = self.lock("get");
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
            None => return Ok(None),
        }
        entries.pop(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.lock("set").put(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock("delete").pop(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
