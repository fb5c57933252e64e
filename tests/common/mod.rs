//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Notify;

use quill::application::posts::PostService;
use quill::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use quill::cache::{CacheConfig, CacheError, CacheStore, MemoryCache};
use quill::domain::entities::PostRecord;

/// Posts held in a map, with counters for store calls.
#[derive(Default)]
pub struct InMemoryPosts {
    posts: Mutex<BTreeMap<i64, PostRecord>>,
    activity: Mutex<Vec<(String, i64)>>,
    point_reads: AtomicUsize,
    writes: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl InMemoryPosts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent call sleep before answering.
    pub fn stall(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn point_reads(&self) -> usize {
        self.point_reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn activity(&self) -> Vec<(String, i64)> {
        self.activity.lock().unwrap().clone()
    }

    pub fn stored(&self, id: i64) -> Option<PostRecord> {
        self.posts.lock().unwrap().get(&id).cloned()
    }

    async fn gate(&self) -> Result<(), RepoError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl PostsRepo for InMemoryPosts {
    async fn find_post_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        self.point_reads.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn find_posts_by_tag(&self, tag: &str) -> Result<Vec<PostRecord>, RepoError> {
        self.gate().await?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|post| post.tags.iter().any(|candidate| candidate == tag))
            .cloned()
            .collect())
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<PostRecord>, RepoError> {
        self.gate().await?;
        let needle = query.to_lowercase();
        Ok(self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|post| {
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PostsWriteRepo for InMemoryPosts {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        let mut posts = self.posts.lock().unwrap();
        let id = posts.keys().next_back().copied().unwrap_or(0) + 1;
        let post = PostRecord {
            id,
            title: params.title,
            content: params.content,
            tags: params.tags,
            created_at: OffsetDateTime::now_utc(),
        };
        posts.insert(id, post.clone());
        self.activity
            .lock()
            .unwrap()
            .push(("new_post".to_string(), id));
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        let mut posts = self.posts.lock().unwrap();
        let post = posts.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.content = params.content;
        post.tags = params.tags;
        Ok(post.clone())
    }
}

/// Reader that, once armed, pauses its next point read after fetching the row
/// until released.
pub struct GatedReader {
    inner: Arc<InMemoryPosts>,
    armed: AtomicBool,
    fetched: Notify,
    release: Notify,
}

impl GatedReader {
    pub fn new(inner: Arc<InMemoryPosts>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            armed: AtomicBool::new(false),
            fetched: Notify::new(),
            release: Notify::new(),
        })
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Resolves once the armed read has its row in hand.
    pub async fn wait_fetched(&self) {
        self.fetched.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl PostsRepo for GatedReader {
    async fn find_post_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let post = self.inner.find_post_by_id(id).await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.fetched.notify_one();
            self.release.notified().await;
        }
        Ok(post)
    }

    async fn find_posts_by_tag(&self, tag: &str) -> Result<Vec<PostRecord>, RepoError> {
        self.inner.find_posts_by_tag(tag).await
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<PostRecord>, RepoError> {
        self.inner.search_posts(query).await
    }
}

/// Cache whose every operation fails.
#[derive(Default)]
pub struct BrokenCache {
    calls: AtomicUsize,
}

impl BrokenCache {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn refuse(&self) -> CacheError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CacheError::Unavailable("connection reset".into())
    }
}

#[async_trait]
impl CacheStore for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(self.refuse())
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(self.refuse())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(self.refuse())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(self.refuse())
    }
}

/// Cache that never answers within any reasonable deadline.
pub struct HangingCache;

#[async_trait]
impl CacheStore for HangingCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Real in-process cache plus counters for writes and deletes.
pub struct RecordingCache {
    inner: MemoryCache,
    sets: AtomicUsize,
    deletes: AtomicUsize,
}

impl RecordingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryCache::new(CacheConfig::default().memory_capacity),
            sets: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        })
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.inner.ping().await
    }
}

pub fn service(posts: Arc<InMemoryPosts>, cache: Arc<dyn CacheStore>) -> PostService {
    let reader: Arc<dyn PostsRepo> = posts.clone();
    let writer: Arc<dyn PostsWriteRepo> = posts;
    PostService::new(reader, writer, cache, CacheConfig::default())
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
