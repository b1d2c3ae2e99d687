//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use crate::error::map_db_err;
use photoshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Comments on a photo, oldest first (paginated).
    pub async fn find_by_photo(
        &self,
        photo_id: i32,
        limit: u64,
        since_id: Option<i32>,
    ) -> AppResult<Vec<comment::Model>> {
        let mut query = Comment::find()
            .filter(comment::Column::PhotoId.eq(photo_id))
            .order_by_asc(comment::Column::Id);

        if let Some(id) = since_id {
            query = query.filter(comment::Column::Id.gt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Comments written by a user, newest first.
    pub async fn find_by_user(&self, user_id: Uuid, limit: u64) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::UserId.eq(user_id))
            .order_by_desc(comment::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Insert a new comment.
    pub async fn create(
        &self,
        user_id: Uuid,
        photo_id: i32,
        opinion: String,
    ) -> AppResult<comment::Model> {
        let model = comment::ActiveModel {
            opinion: Set(opinion),
            user_id: Set(user_id),
            photo_id: Set(photo_id),
            ..Default::default()
        };

        let created = model.insert(self.db.as_ref()).await.map_err(map_db_err)?;
        debug!(comment_id = created.id, photo_id, "Created comment");
        Ok(created)
    }

    /// Replace the comment text.
    pub async fn update_opinion(&self, id: i32, opinion: String) -> AppResult<comment::Model> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;

        let mut active: comment::ActiveModel = existing.into();
        active.opinion = Set(opinion);
        active.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a comment.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }
}
