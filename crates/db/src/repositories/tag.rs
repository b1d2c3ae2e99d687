//! Tag repository.

use std::sync::Arc;

use crate::entities::{PhotoTag, Tag, photo_tag, tag};
use crate::error::map_db_err;
use photoshare_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tag by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get or create a tag.
    ///
    /// Two concurrent callers may both miss the lookup; the loser's insert
    /// fails with a uniqueness violation.
    pub async fn get_or_create(&self, name: &str) -> AppResult<tag::Model> {
        if let Some(tag) = self.find_by_name(name).await? {
            return Ok(tag);
        }

        let model = tag::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let created = model.insert(self.db.as_ref()).await.map_err(map_db_err)?;
        debug!(tag_id = created.id, name = %created.name, "Created tag");
        Ok(created)
    }

    /// Tags linked to a photo, by name. Duplicate links yield one tag.
    pub async fn find_by_photo(&self, photo_id: i32) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .inner_join(PhotoTag)
            .filter(photo_tag::Column::PhotoId.eq(photo_id))
            .distinct()
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}
