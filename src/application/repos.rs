//! Repository traits describing persistence adapters.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
    #[error("transaction failed during {stage}: {message}")]
    Transaction { stage: TxStage, message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn transaction(stage: TxStage, err: impl fmt::Display) -> Self {
        Self::Transaction {
            stage,
            message: err.to_string(),
        }
    }
}

/// Step of the create-post transaction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Begin,
    InsertPost,
    InsertActivity,
    Commit,
}

impl TxStage {
    pub fn as_str(self) -> &'static str {
        match self {
            TxStage::Begin => "begin",
            TxStage::InsertPost => "insert_post",
            TxStage::InsertActivity => "insert_activity",
            TxStage::Commit => "commit",
        }
    }
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_post_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;

    /// Posts whose tag array contains `tag`, oldest id first.
    async fn find_posts_by_tag(&self, tag: &str) -> Result<Vec<PostRecord>, RepoError>;

    /// Full-text matches over title and content, most relevant first.
    async fn search_posts(&self, query: &str) -> Result<Vec<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Insert the post and its `new_post` activity row as one transaction.
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Replace title, content and tags of the post with `params.id`.
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;
}
