//! Photo repository.

use std::sync::Arc;

use crate::entities::{Photo, PhotoTag, photo, photo_tag};
use crate::error::map_db_err;
use photoshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use tracing::debug;
use uuid::Uuid;

/// Fields supplied when uploading a photo.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    /// Owner.
    pub user_id: Uuid,
    /// Storage path of the original.
    pub path: String,
    /// Caption.
    pub description: String,
    /// Identifier at the image host.
    pub public_photo_id: String,
}

/// Photo repository for database operations.
#[derive(Clone)]
pub struct PhotoRepository {
    db: Arc<DatabaseConnection>,
}

impl PhotoRepository {
    /// Create a new photo repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a photo by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<photo::Model>> {
        Photo::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get a photo by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<photo::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))
    }

    /// Find a photo by its image-host identifier.
    pub async fn find_by_public_id(&self, public_photo_id: &str) -> AppResult<Option<photo::Model>> {
        Photo::find()
            .filter(photo::Column::PublicPhotoId.eq(public_photo_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get a user's photos, newest first (paginated).
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: u64,
        until_id: Option<i32>,
    ) -> AppResult<Vec<photo::Model>> {
        user_photos_query(user_id, limit, until_id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get photos carrying a tag, newest first.
    pub async fn find_by_tag(&self, tag_id: i32, limit: u64) -> AppResult<Vec<photo::Model>> {
        Photo::find()
            .inner_join(PhotoTag)
            .filter(photo_tag::Column::TagId.eq(tag_id))
            .distinct()
            .order_by_desc(photo::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Insert a new photo.
    pub async fn create(&self, new_photo: NewPhoto) -> AppResult<photo::Model> {
        let model = photo::ActiveModel {
            path: Set(new_photo.path),
            description: Set(new_photo.description),
            path_transform: Set(None),
            user_id: Set(new_photo.user_id),
            public_photo_id: Set(new_photo.public_photo_id),
            ..Default::default()
        };

        let created = model.insert(self.db.as_ref()).await.map_err(map_db_err)?;
        debug!(photo_id = created.id, user_id = %created.user_id, "Created photo");
        Ok(created)
    }

    /// Replace the caption.
    pub async fn update_description(&self, id: i32, description: String) -> AppResult<photo::Model> {
        let mut active: photo::ActiveModel = self.get_by_id(id).await?.into();
        active.description = Set(description);
        active.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Record the path of the transformed variant.
    pub async fn set_transform(&self, id: i32, path_transform: String) -> AppResult<photo::Model> {
        let mut active: photo::ActiveModel = self.get_by_id(id).await?.into();
        active.path_transform = Set(Some(path_transform));
        active.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a photo. Its comments, ratings and tag links go with it.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = Photo::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        debug!(photo_id = id, rows = result.rows_affected, "Deleted photo");
        Ok(result.rows_affected > 0)
    }

    /// Link a tag to a photo. Linking the same pair twice creates two links.
    pub async fn attach_tag(&self, photo_id: i32, tag_id: i32) -> AppResult<photo_tag::Model> {
        let model = photo_tag::ActiveModel {
            photo_id: Set(Some(photo_id)),
            tag_id: Set(Some(tag_id)),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Remove every link between a photo and a tag. Returns the number removed.
    pub async fn detach_tag(&self, photo_id: i32, tag_id: i32) -> AppResult<u64> {
        let result = PhotoTag::delete_many()
            .filter(photo_tag::Column::PhotoId.eq(photo_id))
            .filter(photo_tag::Column::TagId.eq(tag_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }
}

fn user_photos_query(user_id: Uuid, limit: u64, until_id: Option<i32>) -> Select<Photo> {
    let mut query = Photo::find()
        .filter(photo::Column::UserId.eq(user_id))
        .order_by_desc(photo::Column::Id);

    if let Some(id) = until_id {
        query = query.filter(photo::Column::Id.lt(id));
    }

    query.limit(limit)
}
