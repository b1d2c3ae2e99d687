//! Mapping of store errors onto [`AppError`].
//!
//! Integrity failures are reported by `PostgreSQL` through SQLSTATE codes;
//! each class gets its own variant so callers can tell a duplicate username
//! from a dropped connection. Nothing here retries.

use photoshare_common::AppError;
use sea_orm::sqlx;
use sea_orm::{DbErr, RuntimeErr};
use tracing::warn;

/// SQLSTATE codes the layer distinguishes.
pub mod sqlstate {
    /// `unique_violation`
    pub const UNIQUE_VIOLATION: &str = "23505";
    /// `foreign_key_violation`
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    /// `not_null_violation`
    pub const NOT_NULL_VIOLATION: &str = "23502";
    /// `check_violation`
    pub const CHECK_VIOLATION: &str = "23514";
    /// `string_data_right_truncation` (value longer than `varchar(n)`)
    pub const STRING_TOO_LONG: &str = "22001";
    /// `invalid_text_representation` (e.g. a value outside an enum type)
    pub const INVALID_TEXT_REPRESENTATION: &str = "22P02";
    /// `dependent_objects_still_exist` (dropping a parent before its children)
    pub const DEPENDENT_OBJECTS_STILL_EXIST: &str = "2BP01";
    /// `undefined_table` (referencing a parent that was never created)
    pub const UNDEFINED_TABLE: &str = "42P01";
    /// `duplicate_table` (creating a table that already exists)
    pub const DUPLICATE_TABLE: &str = "42P07";
    /// `duplicate_object` (creating a type that already exists)
    pub const DUPLICATE_OBJECT: &str = "42710";
}

/// Convert a [`DbErr`] into an [`AppError`], keeping the store's message.
pub fn map_db_err(err: DbErr) -> AppError {
    match &err {
        DbErr::RecordNotFound(what) => return AppError::NotFound(what.clone()),
        DbErr::RecordNotUpdated => return AppError::NotFound("record not updated".to_string()),
        _ => {}
    }

    let Some((code, message)) = database_error(&err) else {
        return AppError::Database(err.to_string());
    };

    match classify_sqlstate(&code, message) {
        Some(mapped) => {
            warn!(sqlstate = %code, error = %mapped, "Statement rejected by the database");
            mapped
        }
        None => AppError::Database(err.to_string()),
    }
}

/// Map a SQLSTATE code to a constraint-violation or schema-ordering error, if it is one.
#[must_use]
pub fn classify_sqlstate(code: &str, message: String) -> Option<AppError> {
    match code {
        sqlstate::UNIQUE_VIOLATION => Some(AppError::UniqueViolation(message)),
        sqlstate::FOREIGN_KEY_VIOLATION => Some(AppError::ForeignKeyViolation(message)),
        sqlstate::NOT_NULL_VIOLATION => Some(AppError::NotNullViolation(message)),
        sqlstate::CHECK_VIOLATION
        | sqlstate::STRING_TOO_LONG
        | sqlstate::INVALID_TEXT_REPRESENTATION => Some(AppError::InvalidValue(message)),
        sqlstate::DEPENDENT_OBJECTS_STILL_EXIST
        | sqlstate::UNDEFINED_TABLE
        | sqlstate::DUPLICATE_TABLE
        | sqlstate::DUPLICATE_OBJECT => Some(AppError::Migration(message)),
        _ => None,
    }
}

/// SQLSTATE and message of a database-side error.
fn database_error(err: &DbErr) -> Option<(String, String)> {
    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) | DbErr::Conn(e) => e,
        _ => return None,
    };

    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => {
            let code = db_err.code()?.into_owned();
            Some((code, db_err.message().to_string()))
        }
        _ => None,
    }
}
