mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use quill::application::posts::{CreatePostCommand, UpdatePostCommand};
use quill::cache::{CacheStore, post_key};
use quill::infra::telemetry;

use common::{BrokenCache, InMemoryPosts, RecordingCache, service};

#[tokio::test]
async fn cache_paths_emit_expected_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let posts = InMemoryPosts::new();
    let cache = RecordingCache::new();
    let healthy = service(posts.clone(), cache.clone());
    let created = healthy
        .create(CreatePostCommand {
            title: "Counted".to_string(),
            content: "body".to_string(),
            tags: Vec::new(),
        })
        .await
        .expect("create");

    // miss, then hit
    healthy.get_and_cache(created.id).await.expect("miss");
    healthy.get_and_cache(created.id).await.expect("hit");

    // corrupt entry
    cache
        .set(&post_key(created.id), b"garbage".to_vec(), Duration::from_secs(300))
        .await
        .expect("seed");
    healthy.get_and_cache(created.id).await.expect("corrupt");

    // read error and failed invalidation
    let degraded = service(posts, Arc::new(BrokenCache::default()));
    degraded.get_and_cache(created.id).await.expect("error path");
    degraded
        .update(UpdatePostCommand {
            id: created.id,
            title: "Counted again".to_string(),
            content: "body".to_string(),
            tags: Vec::new(),
        })
        .await
        .expect("update");

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((composite_key.key().name().to_string(), count)),
            _ => None,
        })
        .collect();

    assert_eq!(counters.get("quill_post_cache_miss_total"), Some(&1));
    assert_eq!(counters.get("quill_post_cache_hit_total"), Some(&1));
    assert_eq!(counters.get("quill_post_cache_corrupt_total"), Some(&1));
    assert_eq!(counters.get("quill_post_cache_invalidate_failed_total"), Some(&1));
    // broken read plus the unreadable version key after it
    assert_eq!(counters.get("quill_post_cache_error_total"), Some(&2));
    assert_eq!(counters.get("quill_post_cache_populate_discarded_total"), None);
}
