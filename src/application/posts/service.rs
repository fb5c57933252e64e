use std::{future::Future, sync::Arc, time::Duration};

use tracing::warn;

use crate::application::repos::{PostsRepo, PostsWriteRepo, RepoError};
use crate::cache::{CacheConfig, CacheError, CacheStore};

use super::types::DEFAULT_STORE_TIMEOUT;

/// Cache-aside orchestration over the post repositories.
///
/// Point reads go through the cache; writes go to the database and then
/// invalidate (never overwrite) the cached snapshot. Tag and full-text
/// queries always hit the database.
#[derive(Clone)]
pub struct PostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) cache: Arc<dyn CacheStore>,
    pub(crate) cache_config: CacheConfig,
    pub(crate) store_timeout: Duration,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        cache: Arc<dyn CacheStore>,
        cache_config: CacheConfig,
    ) -> Self {
        Self {
            reader,
            writer,
            cache,
            cache_config,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub(crate) async fn store_call<T, F>(&self, op: &'static str, call: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    target = "quill::posts",
                    op,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(RepoError::Timeout)
            }
        }
    }

    pub(crate) async fn cache_call<T, F>(&self, call: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.cache_config.operation_timeout, call)
            .await
            .unwrap_or(Err(CacheError::Timeout))
    }
}
