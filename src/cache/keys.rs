//! Cache key format.

pub const POST_KEY_PREFIX: &str = "post";

/// Key under which the snapshot of post `id` is stored: `post:<id>`.
pub fn post_key(id: i64) -> String {
    format!("{POST_KEY_PREFIX}:{id}")
}

/// Key holding the token of the latest write to post `id`: `post:<id>:version`.
///
/// Every update stores a fresh token here. A reader that saw a different
/// token before its database fetch knows its snapshot may predate the write.
pub fn post_version_key(id: i64) -> String {
    format!("{POST_KEY_PREFIX}:{id}:version")
}
