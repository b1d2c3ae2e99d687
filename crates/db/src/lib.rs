//! Database layer for photoshare.

pub mod entities;
pub mod error;
pub mod migrations;
pub mod repositories;
pub mod schema;
pub mod test_utils;

pub use error::map_db_err;

use photoshare_common::{AppError, AppResult, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> AppResult<DatabaseConnection> {
    let database = &config.database;
    let timeout = Duration::from_secs(database.connect_timeout_secs);
    let mut opt = ConnectOptions::new(&database.url);

    opt.max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(database.sqlx_logging)
        .sqlx_logging_level(LevelFilter::Debug);

    let db = Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    info!(
        max_connections = database.max_connections,
        "Connected to database"
    );
    Ok(db)
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> AppResult<()> {
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Migration(e.to_string()))
}

/// Roll back every applied migration.
pub async fn rollback(db: &DatabaseConnection) -> AppResult<()> {
    migrations::Migrator::down(db, None)
        .await
        .map_err(|e| AppError::Migration(e.to_string()))
}
