//! API handlers organized by resource type.
//!
//! Request parsing helpers shared by the handlers live here so every
//! malformed request surfaces through the same JSON error shape.

mod health;
mod posts;

pub use health::*;
pub use posts::*;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use serde::Deserialize;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Post ids are positive integers; anything else is rejected before the
/// service is consulted.
pub(crate) fn parse_post_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::bad_request(
            "Invalid id parameter",
            Some(format!("`{raw}` is not a positive integer")),
        )),
    }
}

/// Query values must be present and non-blank.
pub(crate) fn required_param(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::bad_request(
            "Missing query parameter",
            Some(format!("`{name}` must be provided")),
        )),
    }
}

pub(crate) fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request("Invalid request body", Some(rejection.body_text()))
}

pub(crate) fn query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::bad_request("Invalid query string", Some(rejection.body_text()))
}
