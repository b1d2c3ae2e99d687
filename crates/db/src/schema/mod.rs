//! Relational schema.
//!
//! [`SchemaRegistry::photoshare`] describes every table, the `role` enum type
//! and the timestamp trigger. [`create`] and [`teardown`] apply it directly,
//! each inside a single transaction; the migration in
//! [`crate::migrations`] applies the same registry.

mod registry;
mod tables;

pub use registry::{STAMP_FUNCTION, SchemaError, SchemaRegistry, TableSpec};
pub use tables::limits;

use photoshare_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, TransactionTrait};
use sea_orm_migration::SchemaManager;
use tracing::info;

use crate::error::map_db_err;

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        Self::Migration(err.to_string())
    }
}

/// Create the whole schema. Nothing is left behind if any step fails.
pub async fn create(db: &DatabaseConnection) -> AppResult<()> {
    let registry = SchemaRegistry::photoshare()?;

    let txn = db.begin().await.map_err(map_db_err)?;
    registry
        .create_all(&SchemaManager::new(&txn))
        .await
        .map_err(map_db_err)?;
    txn.commit().await.map_err(map_db_err)?;

    info!(tables = registry.creation_order().len(), "Schema created");
    Ok(())
}

/// Drop the whole schema, children first.
pub async fn teardown(db: &DatabaseConnection) -> AppResult<()> {
    let registry = SchemaRegistry::photoshare()?;

    let txn = db.begin().await.map_err(map_db_err)?;
    registry
        .drop_all(&SchemaManager::new(&txn))
        .await
        .map_err(map_db_err)?;
    txn.commit().await.map_err(map_db_err)?;

    info!("Schema dropped");
    Ok(())
}
