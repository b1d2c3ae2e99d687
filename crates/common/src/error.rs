//! Error types for photoshare.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Lookup Errors ===
    /// A row looked up by key does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No user with this id.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// No photo with this id.
    #[error("Photo not found: {0}")]
    PhotoNotFound(String),

    // === Constraint Violations ===
    /// A unique column or primary key already holds this value.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row is missing.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A required column was left empty.
    #[error("Not-null constraint violated: {0}")]
    NotNullViolation(String),

    /// Value rejected by the column type: too long, outside an enumeration,
    /// or failing a check constraint.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    // === Infrastructure Errors ===
    /// Schema creation, teardown or migration failed.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Any other store failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::PhotoNotFound(_) => "PHOTO_NOT_FOUND",
            Self::UniqueViolation(_) => "UNIQUE_VIOLATION",
            Self::ForeignKeyViolation(_) => "FOREIGN_KEY_VIOLATION",
            Self::NotNullViolation(_) => "NOT_NULL_VIOLATION",
            Self::InvalidValue(_) => "INVALID_VALUE",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether the store rejected a write because of an integrity rule.
    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::NotNullViolation(_)
                | Self::InvalidValue(_)
        )
    }

    /// Returns whether this error is a missing record.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::UserNotFound(_) | Self::PhotoNotFound(_)
        )
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
