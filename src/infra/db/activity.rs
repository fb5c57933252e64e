use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;

use crate::application::repos::RepoError;
use crate::domain::entities::ActivityLogRecord;
use crate::domain::types::ActivityAction;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ActivityLogRow {
    id: i64,
    action: String,
    post_id: i64,
    logged_at: OffsetDateTime,
}

impl TryFrom<ActivityLogRow> for ActivityLogRecord {
    type Error = RepoError;

    fn try_from(row: ActivityLogRow) -> Result<Self, Self::Error> {
        let action = row
            .action
            .parse::<ActivityAction>()
            .map_err(RepoError::from_persistence)?;
        Ok(Self {
            id: row.id,
            action,
            post_id: row.post_id,
            logged_at: row.logged_at,
        })
    }
}

impl PostgresRepositories {
    /// Append an activity row inside the caller's transaction.
    pub(crate) async fn append_activity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        action: ActivityAction,
        post_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (action, post_id, logged_at)
            VALUES ($1, $2, NOW())
            "#,
        )
        .bind(action.as_str())
        .bind(post_id)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn list_activity_for_post(
        &self,
        post_id: i64,
    ) -> Result<Vec<ActivityLogRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ActivityLogRow>(
            r#"
            SELECT id, action, post_id, logged_at
            FROM activity_logs
            WHERE post_id = $1
            ORDER BY id
            "#,
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ActivityLogRecord::try_from).collect()
    }
}
