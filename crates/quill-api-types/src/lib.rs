//! Request and response envelopes for the Quill `/v1` API.
//!
//! Every successful response wraps its payload in a named envelope
//! (`{"post": ...}`, `{"posts": [...]}`) so clients can add fields without
//! breaking older readers.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Body of `POST /v1/posts`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body of `PUT|PATCH /v1/posts/{id}`. The update is a full replace.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostUpdateRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostEnvelope {
    pub post: PostView,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostsEnvelope {
    pub posts: Vec<PostView>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemInfo {
    pub environment: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthEnvelope {
    pub status: String,
    pub system_info: SystemInfo,
}
