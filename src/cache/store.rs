//! Cache backend contract.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to the cache. Never surfaced to API clients.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out")]
    Timeout,
}

/// Byte-oriented key/value store with per-key expiry.
///
/// A missing or expired key is `Ok(None)`, not an error.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}
