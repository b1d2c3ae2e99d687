//! Initial schema: users, photos, tags, comments, ratings and photo/tag links.

use sea_orm_migration::prelude::*;

use crate::schema::SchemaRegistry;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn registry() -> Result<SchemaRegistry, DbErr> {
    SchemaRegistry::photoshare().map_err(|e| DbErr::Migration(e.to_string()))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        registry()?.create_all(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        registry()?.drop_all(manager).await
    }
}
