mod commands;
mod queries;
mod service;
pub mod types;

pub use service::*;
pub use types::{
    CreatePostCommand, DEFAULT_STORE_TIMEOUT, PostServiceError, UpdatePostCommand,
    ensure_non_empty,
};
