//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::types::ActivityAction;

/// A stored post. `id` and `created_at` are assigned by the store.
///
/// This is also the snapshot format written to the cache, so it must stay
/// self-describing (JSON) and round-trip losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLogRecord {
    pub id: i64,
    pub action: ActivityAction,
    pub post_id: i64,
    pub logged_at: OffsetDateTime,
}
