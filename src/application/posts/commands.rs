use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, UpdatePostParams};
use crate::cache::{post_key, post_version_key};
use crate::domain::entities::PostRecord;
use crate::domain::tags::normalize_tags;

use super::service::PostService;
use super::types::{CreatePostCommand, PostServiceError, UpdatePostCommand, ensure_non_empty};

impl PostService {
    /// Create a post and its activity entry atomically. The cache is not
    /// touched: a fresh id cannot have a snapshot yet.
    pub async fn create(&self, command: CreatePostCommand) -> Result<PostRecord, PostServiceError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.content, "content")?;
        let tags = normalize_tags(command.tags)?;

        let params = CreatePostParams {
            title: command.title,
            content: command.content,
            tags,
        };

        let post = self
            .store_call("create_post", self.writer.create_post(params))
            .await?;

        info!(target = "quill::posts", post_id = post.id, "post created");
        Ok(post)
    }

    /// Replace a post, then bump its version token and drop its cached
    /// snapshot.
    ///
    /// A failed invalidation is logged but does not fail the update; the
    /// stale entry then lives at most one TTL.
    pub async fn update(&self, command: UpdatePostCommand) -> Result<PostRecord, PostServiceError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.content, "content")?;
        let tags = normalize_tags(command.tags)?;

        let params = UpdatePostParams {
            id: command.id,
            title: command.title,
            content: command.content,
            tags,
        };

        let post = self
            .store_call("update_post", self.writer.update_post(params))
            .await?;

        self.invalidate(post.id).await;
        info!(target = "quill::posts", post_id = post.id, "post updated");
        Ok(post)
    }

    /// The version token is written before the delete so that a reader whose
    /// populate lands after the delete still sees the new token.
    async fn invalidate(&self, id: i64) {
        let key = post_key(id);
        let version = Uuid::new_v4().to_string().into_bytes();
        let bumped = self
            .cache_call(
                self.cache
                    .set(&post_version_key(id), version, self.cache_config.ttl),
            )
            .await;
        let deleted = self.cache_call(self.cache.delete(&key)).await;

        if let Err(err) = bumped.and(deleted) {
            counter!("quill_post_cache_invalidate_failed_total").increment(1);
            warn!(
                target = "quill::posts",
                key = %key,
                error = %err,
                ttl_secs = self.cache_config.ttl.as_secs(),
                "cache invalidation failed; entry may be stale until it expires"
            );
        }
    }
}
