use time::OffsetDateTime;

use crate::domain::entities::PostRecord;
use crate::domain::tags::decode_tags;

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) created_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            tags: decode_tags(row.tags),
            created_at: row.created_at,
        }
    }
}
