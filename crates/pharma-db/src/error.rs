//! # Database Error Types
//!
//! Error types for repository operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite error (sqlx::Error) / malformed JSON document                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (pharma-shop) ← serialized for the UI shell                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Repository operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violated (duplicate id, duplicate slug).
    #[error("{field} '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Could not open or reach the backing store.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Database query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    /// A stored JSON document column could not be decoded.
    #[error("Stored document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a not-found error.
    pub fn not_found(entity: &str, id: &str) -> Self {
        DbError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Creates a unique-violation error.
    pub fn unique_violation(field: &str, value: &str) -> Self {
        DbError::UniqueViolation {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Convenience type alias for Results with DbError.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DbError::not_found("Order", "ORD-1001");
        assert_eq!(err.to_string(), "Order not found: ORD-1001");

        let err = DbError::unique_violation("id", "ORD-1001");
        assert_eq!(err.to_string(), "id 'ORD-1001' already exists");
    }
}
