use metrics::counter;
use tracing::{debug, warn};

use crate::cache::{post_key, post_version_key};
use crate::domain::entities::PostRecord;

use super::service::PostService;
use super::types::{PostServiceError, ensure_non_empty};

impl PostService {
    /// Cache-aside point read.
    ///
    /// A cache hit returns immediately. A miss, a cache error, or an
    /// undecodable entry falls through to the database; a successful database
    /// read repopulates the cache best-effort.
    ///
    /// The post's version token is read before the database fetch and again
    /// after the populate. If an update landed in between, the snapshot just
    /// written may predate it and is deleted again.
    pub async fn get_and_cache(&self, id: i64) -> Result<PostRecord, PostServiceError> {
        let key = post_key(id);

        match self.cache_call(self.cache.get(&key)).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<PostRecord>(&bytes) {
                Ok(post) if post.id == id => {
                    counter!("quill_post_cache_hit_total").increment(1);
                    return Ok(post);
                }
                Ok(post) => {
                    counter!("quill_post_cache_corrupt_total").increment(1);
                    warn!(
                        target = "quill::posts",
                        key = %key,
                        cached_id = post.id,
                        "cache entry belongs to another post; ignoring"
                    );
                }
                Err(err) => {
                    counter!("quill_post_cache_corrupt_total").increment(1);
                    warn!(
                        target = "quill::posts",
                        key = %key,
                        error = %err,
                        "cache entry could not be decoded; ignoring"
                    );
                }
            },
            Ok(None) => {
                counter!("quill_post_cache_miss_total").increment(1);
            }
            Err(err) => {
                counter!("quill_post_cache_error_total").increment(1);
                warn!(
                    target = "quill::posts",
                    key = %key,
                    error = %err,
                    "cache read failed; falling back to database"
                );
            }
        }

        let version = self.read_version(id).await;

        let post = self
            .store_call("find_post_by_id", self.reader.find_post_by_id(id))
            .await?
            .ok_or(PostServiceError::NotFound)?;

        // Without a version to compare against, a populate could not be undone.
        if let Some(version) = version {
            self.populate(&key, &post, version).await;
        }
        Ok(post)
    }

    /// `None` when the version key could not be read.
    async fn read_version(&self, id: i64) -> Option<Option<Vec<u8>>> {
        let key = post_version_key(id);
        match self.cache_call(self.cache.get(&key)).await {
            Ok(version) => Some(version),
            Err(err) => {
                counter!("quill_post_cache_error_total").increment(1);
                warn!(
                    target = "quill::posts",
                    key = %key,
                    error = %err,
                    "post version unreadable; skipping cache populate"
                );
                None
            }
        }
    }

    async fn populate(&self, key: &str, post: &PostRecord, version: Option<Vec<u8>>) {
        let bytes = match serde_json::to_vec(post) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    target = "quill::posts",
                    key,
                    error = %err,
                    "post could not be encoded for cache"
                );
                return;
            }
        };

        if let Err(err) = self
            .cache_call(self.cache.set(key, bytes, self.cache_config.ttl))
            .await
        {
            counter!("quill_post_cache_error_total").increment(1);
            warn!(
                target = "quill::posts",
                key,
                error = %err,
                "cache populate failed"
            );
            return;
        }

        if self.read_version(post.id).await == Some(version) {
            debug!(target = "quill::posts", key, "cache populated");
            return;
        }

        counter!("quill_post_cache_populate_discarded_total").increment(1);
        debug!(
            target = "quill::posts",
            key,
            "post updated during read; discarding snapshot"
        );
        if let Err(err) = self.cache_call(self.cache.delete(key)).await {
            counter!("quill_post_cache_error_total").increment(1);
            warn!(
                target = "quill::posts",
                key,
                error = %err,
                "failed to discard possibly stale snapshot"
            );
        }
    }

    pub async fn find_by_tag(&self, tag: &str) -> Result<Vec<PostRecord>, PostServiceError> {
        ensure_non_empty(tag, "tag")?;
        let posts = self
            .store_call("find_posts_by_tag", self.reader.find_posts_by_tag(tag.trim()))
            .await?;
        Ok(posts)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<PostRecord>, PostServiceError> {
        ensure_non_empty(query, "query")?;
        let posts = self
            .store_call("search_posts", self.reader.search_posts(query.trim()))
            .await?;
        Ok(posts)
    }
}
