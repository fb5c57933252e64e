//! Redis-backed cache shared by every process of the deployment.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, RedisError, aio::ConnectionManager};
use tracing::info;

use super::store::{CacheError, CacheStore};

/// Redis client over a single multiplexed, auto-reconnecting connection.
///
/// Cloning is cheap; every clone shares the underlying connection.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(host: &str, port: u16) -> Result<Self, CacheError> {
        let url = format!("redis://{host}:{port}/");
        let client = redis::Client::open(url.as_str()).map_err(map_redis_error)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        info!(target = "quill::cache", host, port, "Connected to redis");
        Ok(Self { manager })
    }
}

fn map_redis_error(err: RedisError) -> CacheError {
    if err.is_timeout() {
        CacheError::Timeout
    } else {
        CacheError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(key, value, seconds)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: () = conn.del(key).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}
