use async_trait::async_trait;

use crate::application::repos::{
    CreatePostParams, PostsWriteRepo, RepoError, TxStage, UpdatePostParams,
};
use crate::domain::entities::PostRecord;
use crate::domain::tags::encode_tags;
use crate::domain::types::ActivityAction;

use super::types::PostRow;
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            content,
            tags,
        } = params;

        // Any early return drops `tx`, which rolls the transaction back.
        let mut tx = self
            .begin()
            .await
            .map_err(|err| RepoError::transaction(TxStage::Begin, err))?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, tags)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, tags, created_at
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(encode_tags(&tags))
        .fetch_one(tx.as_mut())
        .await
        .map_err(|err| RepoError::transaction(TxStage::InsertPost, err))?;

        self.append_activity(&mut tx, ActivityAction::NewPost, row.id)
            .await
            .map_err(|err| RepoError::transaction(TxStage::InsertActivity, err))?;

        tx.commit()
            .await
            .map_err(|err| RepoError::transaction(TxStage::Commit, err))?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            content,
            tags,
        } = params;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $2,
                content = $3,
                tags = $4
            WHERE id = $1
            RETURNING id, title, content, tags, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(encode_tags(&tags))
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }
}
