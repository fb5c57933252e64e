//! Post snapshot cache.
//!
//! The cache is an accelerator only: every entry can be rebuilt from the
//! database, so callers treat any cache failure as a miss. Two backends
//! implement [`CacheStore`]:
//!
//! - [`RedisCache`]: shared across processes, expiry handled by Redis.
//! - [`MemoryCache`]: bounded in-process LRU with per-entry expiry.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! backend = "redis"   # or "memory"
//! host = "localhost"
//! port = 6379
//! ttl_seconds = 300
//! ```

mod config;
mod keys;
mod memory;
mod redis_cache;
mod store;

pub use config::CacheConfig;
pub use keys::{POST_KEY_PREFIX, post_key, post_version_key};
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
pub use store::{CacheError, CacheStore};
