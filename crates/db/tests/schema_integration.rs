//! Schema integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p photoshare-db --test schema_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `photoshare_test`)
//!   `TEST_DB_PASSWORD` (default: `photoshare_test`)
//!
//! Each test creates its own database and drops it afterwards.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use photoshare_common::AppError;
use photoshare_db::entities::{Role, user};
use photoshare_db::repositories::{
    CommentRepository, NewPhoto, NewUser, PhotoRepository, RatingRepository, TagRepository,
    UserRepository,
};
use photoshare_db::schema;
use photoshare_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use uuid::Uuid;

const SCHEMA_TABLES: [&str; 6] = [
    "comments",
    "photo_m2m_tag",
    "photos",
    "ratings",
    "tags",
    "users",
];

async fn fresh() -> (TestDatabase, Arc<DatabaseConnection>) {
    let db = TestDatabase::create_unique()
        .await
        .expect("Failed to create test database");
    schema::create(db.connection()).await.expect("Failed to create schema");
    let conn = db
        .shared_connection()
        .await
        .expect("Failed to open shared connection");
    (db, conn)
}

async fn insert_user(conn: &Arc<DatabaseConnection>, username: &str) -> user::Model {
    UserRepository::new(conn.clone())
        .create(NewUser::new(
            username,
            format!("{username}@example.com"),
            "$argon2id$hash",
        ))
        .await
        .expect("Failed to insert user")
}

fn new_photo(user_id: Uuid, key: &str) -> NewPhoto {
    NewPhoto {
        user_id,
        path: format!("uploads/{key}.jpg"),
        description: "sunset".to_string(),
        public_photo_id: format!("pub_{key}"),
    }
}

async fn count_rows(conn: &DatabaseConnection, table: &str) -> i64 {
    let row = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            format!("SELECT COUNT(*) AS n FROM \"{table}\""),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_create_then_teardown_leaves_nothing() {
    let (db, _) = fresh().await;

    assert_eq!(db.table_names().await.unwrap(), SCHEMA_TABLES);
    assert!(db.type_exists("role").await.unwrap());

    schema::teardown(db.connection()).await.unwrap();

    assert!(db.table_names().await.unwrap().is_empty());
    assert!(!db.type_exists("role").await.unwrap());

    // The schema can be built again after a teardown.
    schema::create(db.connection()).await.unwrap();
    assert_eq!(db.table_names().await.unwrap().len(), SCHEMA_TABLES.len());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_failed_create_leaves_nothing_behind() {
    let db = TestDatabase::create_unique().await.unwrap();

    // A stray table with the name of the last table to be created.
    db.connection()
        .execute_unprepared("CREATE TABLE ratings (x int)")
        .await
        .unwrap();

    let err = schema::create(db.connection()).await.unwrap_err();
    assert!(matches!(err, AppError::Migration(_)), "got {err:?}");

    assert_eq!(db.table_names().await.unwrap(), ["ratings"]);
    assert!(!db.type_exists("role").await.unwrap());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_create_twice_is_a_migration_error() {
    let (db, _) = fresh().await;

    let err = schema::create(db.connection()).await.unwrap_err();
    assert!(matches!(err, AppError::Migration(_)), "got {err:?}");
    assert_eq!(db.table_names().await.unwrap(), SCHEMA_TABLES);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_cleanup_empties_tables_but_keeps_schema() {
    let (db, conn) = fresh().await;

    let owner = insert_user(&conn, "alice").await;
    PhotoRepository::new(conn.clone())
        .create(new_photo(owner.id, "a"))
        .await
        .unwrap();

    db.cleanup().await.unwrap();

    assert_eq!(count_rows(&conn, "users").await, 0);
    assert_eq!(count_rows(&conn, "photos").await, 0);
    assert_eq!(db.table_names().await.unwrap(), SCHEMA_TABLES);

    // Identities restart, so the next photo gets id 1 again.
    let owner = insert_user(&conn, "bob").await;
    let photo = PhotoRepository::new(conn.clone())
        .create(new_photo(owner.id, "b"))
        .await
        .unwrap();
    assert_eq!(photo.id, 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migration_round_trip() {
    let db = TestDatabase::create_unique().await.unwrap();

    photoshare_db::migrate(db.connection()).await.unwrap();
    let mut tables = db.table_names().await.unwrap();
    tables.retain(|t| t != "seaql_migrations");
    assert_eq!(tables, SCHEMA_TABLES);

    photoshare_db::rollback(db.connection()).await.unwrap();
    let mut tables = db.table_names().await.unwrap();
    tables.retain(|t| t != "seaql_migrations");
    assert!(tables.is_empty());
    assert!(!db.type_exists("role").await.unwrap());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_parent_cannot_be_dropped_before_children() {
    let (db, conn) = fresh().await;

    let err = conn
        .execute_unprepared("DROP TABLE users")
        .await
        .unwrap_err();

    assert!(matches!(
        photoshare_db::map_db_err(err),
        AppError::Migration(_)
    ));
    assert_eq!(db.table_names().await.unwrap(), SCHEMA_TABLES);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_user_defaults() {
    let (db, conn) = fresh().await;

    let user = insert_user(&conn, "alice").await;

    assert_eq!(user.role, Role::User);
    assert!(!user.id.is_nil());
    assert!(!user.confirmed);
    assert!(!user.banned);
    assert!(user.banned_at.is_none());
    assert_eq!(user.created_at, user.updated_at);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_username_rejected() {
    let (db, conn) = fresh().await;
    let repo = UserRepository::new(conn.clone());

    insert_user(&conn, "alice").await;
    let err = repo
        .create(NewUser::new("alice", "other@example.com", "hash"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UniqueViolation(_)), "got {err:?}");

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_email_rejected() {
    let (db, conn) = fresh().await;
    let repo = UserRepository::new(conn.clone());

    insert_user(&conn, "alice").await;
    let err = repo
        .create(NewUser::new("alice2", "alice@example.com", "hash"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UniqueViolation(_)), "got {err:?}");

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_tag_rejected() {
    let (db, conn) = fresh().await;

    conn.execute_unprepared("INSERT INTO tags (name) VALUES ('nature')")
        .await
        .unwrap();
    let err = conn
        .execute_unprepared("INSERT INTO tags (name) VALUES ('nature')")
        .await
        .unwrap_err();

    assert!(matches!(
        photoshare_db::map_db_err(err),
        AppError::UniqueViolation(_)
    ));

    // The repository path reuses the existing tag instead.
    let tag = TagRepository::new(conn.clone())
        .get_or_create("nature")
        .await
        .unwrap();
    assert_eq!(tag.name, "nature");
    assert_eq!(count_rows(&conn, "tags").await, 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_unknown_role_rejected() {
    let (db, conn) = fresh().await;

    let err = conn
        .execute_unprepared(
            "INSERT INTO users (username, email, password, role) \
             VALUES ('root', 'root@example.com', 'hash', 'superadmin')",
        )
        .await
        .unwrap_err();

    assert!(matches!(
        photoshare_db::map_db_err(err),
        AppError::InvalidValue(_)
    ));
    assert_eq!(count_rows(&conn, "users").await, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_long_description_rejected() {
    let (db, conn) = fresh().await;
    let owner = insert_user(&conn, "alice").await;

    let mut photo = new_photo(owner.id, "long");
    photo.description = "x".repeat(251);
    let err = PhotoRepository::new(conn.clone())
        .create(photo)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidValue(_)), "got {err:?}");

    let mut photo = new_photo(owner.id, "edge");
    photo.description = "x".repeat(250);
    assert!(PhotoRepository::new(conn.clone()).create(photo).await.is_ok());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_photo_requires_existing_owner() {
    let (db, conn) = fresh().await;

    let err = PhotoRepository::new(conn.clone())
        .create(new_photo(Uuid::new_v4(), "orphan"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ForeignKeyViolation(_)), "got {err:?}");

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_user_delete_cascades() {
    let (db, conn) = fresh().await;
    let photos = PhotoRepository::new(conn.clone());

    let owner = insert_user(&conn, "alice").await;
    let other = insert_user(&conn, "bob").await;

    let photo = photos.create(new_photo(owner.id, "a")).await.unwrap();
    let tag = TagRepository::new(conn.clone())
        .get_or_create("nature")
        .await
        .unwrap();
    photos.attach_tag(photo.id, tag.id).await.unwrap();
    CommentRepository::new(conn.clone())
        .create(other.id, photo.id, "lovely".to_string())
        .await
        .unwrap();
    RatingRepository::new(conn.clone())
        .create(other.id, photo.id, 5)
        .await
        .unwrap();

    assert!(UserRepository::new(conn.clone()).delete(owner.id).await.unwrap());

    assert_eq!(count_rows(&conn, "photos").await, 0);
    assert_eq!(count_rows(&conn, "comments").await, 0);
    assert_eq!(count_rows(&conn, "ratings").await, 0);
    assert_eq!(count_rows(&conn, "photo_m2m_tag").await, 0);
    // Tags and unrelated users survive.
    assert_eq!(count_rows(&conn, "tags").await, 1);
    assert_eq!(count_rows(&conn, "users").await, 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_photo_delete_cascades() {
    let (db, conn) = fresh().await;
    let photos = PhotoRepository::new(conn.clone());

    let owner = insert_user(&conn, "alice").await;
    let keep = photos.create(new_photo(owner.id, "keep")).await.unwrap();
    let gone = photos.create(new_photo(owner.id, "gone")).await.unwrap();
    let tag = TagRepository::new(conn.clone())
        .get_or_create("city")
        .await
        .unwrap();

    for photo in [&keep, &gone] {
        photos.attach_tag(photo.id, tag.id).await.unwrap();
        CommentRepository::new(conn.clone())
            .create(owner.id, photo.id, "mine".to_string())
            .await
            .unwrap();
    }

    assert!(photos.delete(gone.id).await.unwrap());

    assert_eq!(count_rows(&conn, "photos").await, 1);
    assert_eq!(count_rows(&conn, "comments").await, 1);
    assert_eq!(count_rows(&conn, "photo_m2m_tag").await, 1);
    assert_eq!(count_rows(&conn, "users").await, 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_tag_delete_removes_links_only() {
    let (db, conn) = fresh().await;
    let photos = PhotoRepository::new(conn.clone());

    let owner = insert_user(&conn, "alice").await;
    let photo = photos.create(new_photo(owner.id, "a")).await.unwrap();
    let tag = TagRepository::new(conn.clone())
        .get_or_create("gone")
        .await
        .unwrap();
    photos.attach_tag(photo.id, tag.id).await.unwrap();

    conn.execute_unprepared(&format!("DELETE FROM tags WHERE id = {}", tag.id))
        .await
        .unwrap();

    assert_eq!(count_rows(&conn, "photo_m2m_tag").await, 0);
    assert_eq!(count_rows(&conn, "photos").await, 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_links_and_ratings_accepted() {
    let (db, conn) = fresh().await;
    let photos = PhotoRepository::new(conn.clone());
    let ratings = RatingRepository::new(conn.clone());

    let owner = insert_user(&conn, "alice").await;
    let photo = photos.create(new_photo(owner.id, "a")).await.unwrap();
    let tag = TagRepository::new(conn.clone())
        .get_or_create("nature")
        .await
        .unwrap();

    photos.attach_tag(photo.id, tag.id).await.unwrap();
    photos.attach_tag(photo.id, tag.id).await.unwrap();
    ratings.create(owner.id, photo.id, 4).await.unwrap();
    ratings.create(owner.id, photo.id, 5).await.unwrap();

    assert_eq!(count_rows(&conn, "photo_m2m_tag").await, 2);
    assert_eq!(
        ratings
            .find_by_user_and_photo(owner.id, photo.id)
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(ratings.average_for_photo(photo.id).await.unwrap(), Some(4.5));

    // Reverse traversal collapses duplicate links.
    let tags = TagRepository::new(conn.clone())
        .find_by_photo(photo.id)
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);
    let tagged = photos.find_by_tag(tag.id, 10).await.unwrap();
    assert_eq!(tagged.len(), 1);

    assert_eq!(photos.detach_tag(photo.id, tag.id).await.unwrap(), 2);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_update_refreshes_updated_at() {
    let (db, conn) = fresh().await;
    let repo = UserRepository::new(conn.clone());

    let user = insert_user(&conn, "alice").await;
    let updated = repo.confirm(user.id).await.unwrap();

    assert!(updated.confirmed);
    assert_eq!(updated.created_at, user.created_at);
    assert!(updated.updated_at > user.updated_at);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_created_at_cannot_be_overwritten() {
    let (db, conn) = fresh().await;

    let user = insert_user(&conn, "alice").await;
    conn.execute_unprepared(&format!(
        "UPDATE users SET created_at = '2000-01-01T00:00:00Z' WHERE id = '{}'",
        user.id
    ))
    .await
    .unwrap();

    let reloaded = UserRepository::new(conn.clone())
        .get_by_id(user.id)
        .await
        .unwrap();
    assert_eq!(reloaded.created_at, user.created_at);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_rating_rejects_missing_photo() {
    let (db, conn) = fresh().await;
    let owner = insert_user(&conn, "alice").await;

    let err = RatingRepository::new(conn.clone())
        .create(owner.id, 999, 3)
        .await
        .unwrap_err();

    assert!(err.is_constraint_violation());

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_defaults_are_usable() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(config.database_url().starts_with("postgres://"));
}
