//! Rating repository.

use std::sync::Arc;

use crate::entities::{Rating, rating};
use crate::error::map_db_err;
use photoshare_common::AppResult;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

/// Rating repository for database operations.
#[derive(Clone)]
pub struct RatingRepository {
    db: Arc<DatabaseConnection>,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Ratings on a photo, oldest first.
    pub async fn find_by_photo(&self, photo_id: i32) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::PhotoId.eq(photo_id))
            .order_by_asc(rating::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Every rating a user gave a photo. There may be more than one.
    pub async fn find_by_user_and_photo(
        &self,
        user_id: Uuid,
        photo_id: i32,
    ) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::PhotoId.eq(photo_id))
            .order_by_asc(rating::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Insert a rating. The score is stored as given.
    pub async fn create(&self, user_id: Uuid, photo_id: i32, score: i32) -> AppResult<rating::Model> {
        let model = rating::ActiveModel {
            rating: Set(score),
            photo_id: Set(photo_id),
            user_id: Set(user_id),
            ..Default::default()
        };

        let created = model.insert(self.db.as_ref()).await.map_err(map_db_err)?;
        debug!(rating_id = created.id, photo_id, score, "Created rating");
        Ok(created)
    }

    /// Mean score of a photo, or `None` when it has no ratings.
    pub async fn average_for_photo(&self, photo_id: i32) -> AppResult<Option<f64>> {
        #[derive(FromQueryResult)]
        struct AverageResult {
            average: Option<f64>,
        }

        let average =
            SimpleExpr::from(Func::avg(Expr::col(rating::Column::Rating))).cast_as(Alias::new("float8"));

        let result = Rating::find()
            .filter(rating::Column::PhotoId.eq(photo_id))
            .select_only()
            .column_as(average, "average")
            .into_model::<AverageResult>()
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.and_then(|r| r.average))
    }

    /// Number of ratings on a photo.
    pub async fn count_for_photo(&self, photo_id: i32) -> AppResult<u64> {
        Rating::find()
            .filter(rating::Column::PhotoId.eq(photo_id))
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Delete a rating.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = Rating::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }
}
