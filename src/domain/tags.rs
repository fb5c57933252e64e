//! Mapping between a post's tag sequence and the nullable `TEXT[]` column.
//!
//! An empty tag list is persisted as SQL `NULL`; both `NULL` and `'{}'` read
//! back as an empty list. Order is preserved in both directions.

use super::error::DomainError;

/// Encode tags for binding to the `tags` column.
pub fn encode_tags(tags: &[String]) -> Option<Vec<String>> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.to_vec())
    }
}

/// Decode a `tags` column value into the domain representation.
pub fn decode_tags(column: Option<Vec<String>>) -> Vec<String> {
    column.unwrap_or_default()
}

/// Trim every tag and reject blank ones. Duplicates are kept as supplied.
pub fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, DomainError> {
    tags.into_iter()
        .enumerate()
        .map(|(index, tag)| {
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                Err(DomainError::validation(format!("tags[{index}] is blank")))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}
