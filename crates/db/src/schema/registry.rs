//! Schema registry.
//!
//! Every table, enum type and timestamp trigger the application owns is
//! registered here, parents before children. The registry is the single
//! description of the schema that both creation and teardown walk.

use sea_orm::{ConnectionTrait, DbErr};
use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

/// Name of the trigger function that owns `created_at` / `updated_at`.
pub const STAMP_FUNCTION: &str = "photoshare_stamp_timestamps";

/// Errors raised while assembling a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A table with this name is already registered.
    #[error("table `{0}` is registered twice")]
    DuplicateTable(String),

    /// A foreign key points at a table that is not registered yet.
    #[error("table `{table}` references `{parent}`, which is not registered before it")]
    MissingParent {
        /// The table being registered.
        table: String,
        /// The table its foreign key targets.
        parent: String,
    },

    /// An enum type with this name is already registered.
    #[error("type `{0}` is registered twice")]
    DuplicateType(String),
}

/// A table definition together with what the registry needs to order it.
#[derive(Debug, Clone)]
pub struct TableSpec {
    iden: DynIden,
    name: String,
    parents: Vec<String>,
    statement: TableCreateStatement,
    indexes: Vec<IndexCreateStatement>,
    stamped: bool,
}

impl TableSpec {
    /// Start a table definition.
    pub fn new<T: IntoIden>(table: T) -> Self {
        let iden = table.into_iden();
        let mut statement = Table::create();
        statement.table(iden.clone());

        Self {
            name: iden.to_string(),
            iden,
            parents: Vec::new(),
            statement,
            indexes: Vec::new(),
            stamped: false,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, mut def: ColumnDef) -> Self {
        self.statement.col(&mut def);
        self
    }

    /// Add `created_at` and `updated_at`, both maintained by the store.
    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        for column in [Timestamps::CreatedAt, Timestamps::UpdatedAt] {
            self.statement.col(
                ColumnDef::new(column)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            );
        }
        self.stamped = true;
        self
    }

    /// Add an `ON DELETE CASCADE` foreign key from `column` to `parent.parent_column`,
    /// plus a plain index on `column`.
    #[must_use]
    pub fn cascade_to<C, P, PC>(mut self, column: C, parent: P, parent_column: PC) -> Self
    where
        C: IntoIden,
        P: IntoIden,
        PC: IntoIden,
    {
        let column = column.into_iden();
        let parent = parent.into_iden();
        let column_name = column.to_string();

        if parent.to_string() != self.name {
            self.parents.push(parent.to_string());
        }

        self.statement.foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_{column_name}", self.name))
                .from(self.iden.clone(), column.clone())
                .to(parent, parent_column)
                .on_delete(ForeignKeyAction::Cascade),
        );

        self.indexes.push(
            Index::create()
                .name(format!("idx_{}_{column_name}", self.name))
                .table(self.iden.clone())
                .col(column)
                .to_owned(),
        );

        self
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tables this one holds foreign keys to.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Whether the timestamp trigger is attached.
    #[must_use]
    pub const fn is_stamped(&self) -> bool {
        self.stamped
    }

    /// The `CREATE TABLE` statement.
    #[must_use]
    pub const fn create_statement(&self) -> &TableCreateStatement {
        &self.statement
    }

    /// Secondary indexes created after the table.
    #[must_use]
    pub fn indexes(&self) -> &[IndexCreateStatement] {
        &self.indexes
    }

    /// The `DROP TABLE` statement. No `CASCADE`: dropping a table that is
    /// still referenced fails.
    #[must_use]
    pub fn drop_statement(&self) -> TableDropStatement {
        Table::drop().table(self.iden.clone()).to_owned()
    }

    fn trigger_sql(&self) -> String {
        format!(
            r#"CREATE TRIGGER "trg_{name}_timestamps" BEFORE INSERT OR UPDATE ON "{name}" FOR EACH ROW EXECUTE FUNCTION {STAMP_FUNCTION}();"#,
            name = self.name
        )
    }
}

#[derive(Iden)]
enum Timestamps {
    CreatedAt,
    UpdatedAt,
}

/// A `PostgreSQL` enum type.
#[derive(Debug, Clone)]
struct EnumSpec {
    name: DynIden,
    values: Vec<DynIden>,
}

/// Ordered set of schema objects.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    enums: Vec<EnumSpec>,
    tables: Vec<TableSpec>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enum type. Types are created before any table.
    pub fn register_enum<N, I, V>(&mut self, name: N, values: I) -> Result<(), SchemaError>
    where
        N: IntoIden,
        I: IntoIterator<Item = V>,
        V: IntoIden,
    {
        let name = name.into_iden();
        if self.enums.iter().any(|e| e.name.to_string() == name.to_string()) {
            return Err(SchemaError::DuplicateType(name.to_string()));
        }

        self.enums.push(EnumSpec {
            name,
            values: values.into_iter().map(IntoIden::into_iden).collect(),
        });
        Ok(())
    }

    /// Register a table. Every table it references must already be registered.
    pub fn register(&mut self, spec: TableSpec) -> Result<(), SchemaError> {
        if self.table(spec.name()).is_some() {
            return Err(SchemaError::DuplicateTable(spec.name));
        }

        if let Some(parent) = spec
            .parents()
            .iter()
            .find(|parent| self.table(parent).is_none())
        {
            return Err(SchemaError::MissingParent {
                table: spec.name.clone(),
                parent: parent.clone(),
            });
        }

        self.tables.push(spec);
        Ok(())
    }

    /// Look up a registered table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Registered tables, parents first.
    pub fn tables(&self) -> impl DoubleEndedIterator<Item = &TableSpec> {
        self.tables.iter()
    }

    /// Table names in creation order.
    #[must_use]
    pub fn creation_order(&self) -> Vec<&str> {
        self.tables.iter().map(TableSpec::name).collect()
    }

    /// Table names in teardown order (children first).
    #[must_use]
    pub fn teardown_order(&self) -> Vec<&str> {
        self.tables.iter().rev().map(TableSpec::name).collect()
    }

    /// Names of the enum types.
    #[must_use]
    pub fn enum_names(&self) -> Vec<String> {
        self.enums.iter().map(|e| e.name.to_string()).collect()
    }

    fn has_stamped_tables(&self) -> bool {
        self.tables.iter().any(TableSpec::is_stamped)
    }

    /// Create every registered object.
    pub async fn create_all(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        for spec in &self.enums {
            debug!(name = %spec.name.to_string(), "Creating enum type");
            manager
                .create_type(
                    Type::create()
                        .as_enum(spec.name.clone())
                        .values(spec.values.clone())
                        .to_owned(),
                )
                .await?;
        }

        if self.has_stamped_tables() {
            manager
                .get_connection()
                .execute_unprepared(&stamp_function_sql())
                .await?;
        }

        for table in &self.tables {
            info!(table = table.name(), "Creating table");
            manager.create_table(table.statement.clone()).await?;

            for index in &table.indexes {
                manager.create_index(index.clone()).await?;
            }

            if table.stamped {
                manager
                    .get_connection()
                    .execute_unprepared(&table.trigger_sql())
                    .await?;
            }
        }

        Ok(())
    }

    /// Drop every registered object, children first.
    pub async fn drop_all(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        for table in self.tables.iter().rev() {
            info!(table = table.name(), "Dropping table");
            manager.drop_table(table.drop_statement()).await?;
        }

        if self.has_stamped_tables() {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP FUNCTION IF EXISTS {STAMP_FUNCTION}();"))
                .await?;
        }

        for spec in self.enums.iter().rev() {
            debug!(name = %spec.name.to_string(), "Dropping enum type");
            manager
                .drop_type(Type::drop().if_exists().name(spec.name.clone()).to_owned())
                .await?;
        }

        Ok(())
    }
}

/// Trigger body: `created_at` is fixed at insert, `updated_at` follows the
/// wall clock on every write. Caller-supplied values are overwritten.
fn stamp_function_sql() -> String {
    format!(
        r"
        CREATE OR REPLACE FUNCTION {STAMP_FUNCTION}() RETURNS TRIGGER AS $$
        BEGIN
            IF TG_OP = 'INSERT' THEN
                NEW.created_at := clock_timestamp();
                NEW.updated_at := NEW.created_at;
            ELSE
                NEW.created_at := OLD.created_at;
                NEW.updated_at := clock_timestamp();
            END IF;
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;
        "
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Iden)]
    enum Parent {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Child {
        Table,
        Id,
        ParentId,
    }

    fn parent() -> TableSpec {
        TableSpec::new(Parent::Table).column(
            ColumnDef::new(Parent::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key()
                .to_owned(),
        )
    }

    fn child() -> TableSpec {
        TableSpec::new(Child::Table)
            .column(
                ColumnDef::new(Child::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key()
                    .to_owned(),
            )
            .column(ColumnDef::new(Child::ParentId).integer().not_null().to_owned())
            .cascade_to(Child::ParentId, Parent::Table, Parent::Id)
            .with_timestamps()
    }

    #[test]
    fn test_child_before_parent_is_rejected() {
        let mut registry = SchemaRegistry::new();
        let err = registry.register(child()).unwrap_err();

        assert_eq!(
            err,
            SchemaError::MissingParent {
                table: "child".to_string(),
                parent: "parent".to_string(),
            }
        );
        assert!(registry.creation_order().is_empty());
    }

    #[test]
    fn test_duplicate_table_is_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(parent()).unwrap();

        let err = registry.register(parent()).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateTable("parent".to_string()));
    }

    #[test]
    fn test_duplicate_enum_is_rejected() {
        #[derive(Iden)]
        enum Mood {
            Table,
            Happy,
        }

        let mut registry = SchemaRegistry::new();
        registry.register_enum(Mood::Table, [Mood::Happy]).unwrap();
        let err = registry.register_enum(Mood::Table, [Mood::Happy]).unwrap_err();

        assert_eq!(err, SchemaError::DuplicateType("mood".to_string()));
        assert_eq!(registry.enum_names(), vec!["mood".to_string()]);
    }

    #[test]
    fn test_orders() {
        let mut registry = SchemaRegistry::new();
        registry.register(parent()).unwrap();
        registry.register(child()).unwrap();

        assert_eq!(registry.creation_order(), vec!["parent", "child"]);
        assert_eq!(registry.teardown_order(), vec!["child", "parent"]);
    }

    #[test]
    fn test_cascade_records_parent_and_index() {
        let spec = child();

        assert_eq!(spec.parents(), ["parent".to_string()]);
        assert_eq!(spec.indexes().len(), 1);
        assert!(spec.is_stamped());

        let sql = spec.create_statement().to_string(PostgresQueryBuilder);
        assert!(sql.contains(r#"CONSTRAINT "fk_child_parent_id""#), "{sql}");
        assert!(sql.contains(r#"REFERENCES "parent" ("id")"#), "{sql}");
        assert!(sql.contains("ON DELETE CASCADE"), "{sql}");
        assert!(sql.contains(r#""created_at""#), "{sql}");
        assert!(sql.contains(r#""updated_at""#), "{sql}");
    }

    #[test]
    fn test_drop_statement_has_no_cascade() {
        let sql = child().drop_statement().to_string(PostgresQueryBuilder);
        assert_eq!(sql, r#"DROP TABLE "child""#);
    }

    #[test]
    fn test_trigger_sql_targets_table() {
        let sql = child().trigger_sql();
        assert!(sql.contains(r#"ON "child""#));
        assert!(sql.contains("BEFORE INSERT OR UPDATE"));
        assert!(sql.contains(STAMP_FUNCTION));
    }

    #[test]
    fn test_stamp_function_keeps_created_at() {
        let sql = stamp_function_sql();
        assert!(sql.contains("NEW.created_at := OLD.created_at"));
        assert!(sql.contains("NEW.updated_at := clock_timestamp()"));
    }
}
