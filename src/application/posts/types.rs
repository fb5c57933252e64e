use std::time::Duration;

use thiserror::Error;

use crate::{application::repos::RepoError, domain::error::DomainError};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors visible to callers of [`super::PostService`].
///
/// Cache failures have no variant: they are absorbed inside the service.
#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("post not found")]
    NotFound,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage unavailable")]
    StorageUnavailable(#[source] RepoError),
}

impl From<RepoError> for PostServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => PostServiceError::NotFound,
            RepoError::InvalidInput { message } => PostServiceError::InvalidInput(message),
            other => PostServiceError::StorageUnavailable(other),
        }
    }
}

impl From<DomainError> for PostServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => PostServiceError::InvalidInput(message),
            other => PostServiceError::StorageUnavailable(RepoError::from_persistence(other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), PostServiceError> {
    if value.trim().is_empty() {
        return Err(PostServiceError::InvalidInput(format!("{field} must not be blank")));
    }
    Ok(())
}
