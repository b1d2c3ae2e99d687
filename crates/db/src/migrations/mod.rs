//! Database migrations.
//!
//! Schema migrations for the database. On `PostgreSQL` each migration runs in
//! its own transaction.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20240408_000001_init;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240408_000001_init::Migration)]
    }
}
