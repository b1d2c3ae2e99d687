//! User repository.

use std::sync::Arc;

use crate::entities::{Role, User, user};
use crate::error::map_db_err;
use chrono::NaiveDate;
use photoshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::debug;
use uuid::Uuid;

/// Fields supplied when registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Already-hashed password.
    pub password_hash: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Initial role.
    pub role: Role,
}

impl NewUser {
    /// A regular user with no display name.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            name: None,
            role: Role::User,
        }
    }
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Insert a new user. The id and timestamps are assigned by the store.
    pub async fn create(&self, new_user: NewUser) -> AppResult<user::Model> {
        let model = user::ActiveModel {
            name: Set(new_user.name),
            username: Set(new_user.username),
            email: Set(new_user.email),
            password: Set(new_user.password_hash),
            refresh_token: Set(None),
            role: Set(new_user.role),
            confirmed: Set(false),
            banned: Set(false),
            banned_at: Set(None),
            avatar: Set(None),
            ..Default::default()
        };

        let created = model.insert(self.db.as_ref()).await.map_err(map_db_err)?;
        debug!(user_id = %created.id, username = %created.username, "Created user");
        Ok(created)
    }

    /// Store or clear the refresh token.
    pub async fn update_refresh_token(
        &self,
        id: Uuid,
        token: Option<String>,
    ) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = self.get_by_id(id).await?.into();
        active.refresh_token = Set(token);
        active.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Mark the email address as confirmed.
    pub async fn confirm(&self, id: Uuid) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = self.get_by_id(id).await?.into();
        active.confirmed = Set(true);
        active.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Change a user's role.
    pub async fn set_role(&self, id: Uuid, role: Role) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = self.get_by_id(id).await?.into();
        active.role = Set(role);
        let updated = active.update(self.db.as_ref()).await.map_err(map_db_err)?;
        debug!(user_id = %id, role = ?role, "Changed user role");
        Ok(updated)
    }

    /// Ban a user as of the given date.
    pub async fn ban(&self, id: Uuid, on: NaiveDate) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = self.get_by_id(id).await?.into();
        active.banned = Set(true);
        active.banned_at = Set(Some(on));
        let updated = active.update(self.db.as_ref()).await.map_err(map_db_err)?;
        debug!(user_id = %id, banned_at = %on, "Banned user");
        Ok(updated)
    }

    /// Lift a ban.
    pub async fn unban(&self, id: Uuid) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = self.get_by_id(id).await?.into();
        active.banned = Set(false);
        active.banned_at = Set(None);
        active.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Set or clear the avatar path.
    pub async fn update_avatar(&self, id: Uuid, avatar: Option<String>) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = self.get_by_id(id).await?.into();
        active.avatar = Set(avatar);
        active.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a user. Their photos, comments and ratings go with them.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = User::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        debug!(user_id = %id, rows = result.rows_affected, "Deleted user");
        Ok(result.rows_affected > 0)
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        User::find().count(self.db.as_ref()).await.map_err(map_db_err)
    }
}
