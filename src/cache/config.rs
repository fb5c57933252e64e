//! Cache policy derived from `[cache]` settings.

use std::{num::NonZeroUsize, time::Duration};

const DEFAULT_TTL_SECS: u64 = 300;
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 250;
const DEFAULT_MEMORY_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime of a post snapshot.
    pub ttl: Duration,
    /// Upper bound for a single cache round-trip before it counts as a miss.
    pub operation_timeout: Duration,
    /// Entry limit for the in-process backend.
    pub memory_capacity: NonZeroUsize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            operation_timeout: Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
            memory_capacity: NonZeroUsize::new(DEFAULT_MEMORY_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            ttl: settings.ttl,
            operation_timeout: settings.timeout,
            memory_capacity: settings.memory_capacity,
        }
    }
}
