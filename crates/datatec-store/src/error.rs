//! # Store Error Types
//!
//! Error types for key/value store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                              │
//! │                                                                     │
//! │  SQLite Error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError (this module) ← Adds context and categorization         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Caller surfaces a user-facing message                              │
//! │                                                                     │
//! │  Exception: a stored blob that fails to parse is NOT an error.      │
//! │  Reads degrade to the caller's default and log a warning, so one    │
//! │  corrupt value can never wedge the whole application.               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use datatec_core::ValidationError;
use thiserror::Error;

/// Key/value store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in a record list.
    ///
    /// ## When This Occurs
    /// - Converting from a document id that does not exist
    /// - A stale link after the source document was deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A value could not be serialized for storage.
    ///
    /// Deserialization failures never surface here; reads fall back to
    /// defaults instead.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Save-time validation failure, surfaced to the user as-is.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound  → StoreError::NotFound
/// sqlx::Error::Database     → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut → StoreError::PoolExhausted
/// Other                     → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "Record",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => {
                StoreError::ConnectionFailed("Pool is closed".to_string())
            }
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
