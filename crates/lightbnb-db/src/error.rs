//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  PostgreSQL Error (sqlx::Error)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Categorized by SQLSTATE                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Web layer picks a status code                                          │
//! │                                                                         │
//! │  A failed query is ALWAYS an Err. "No rows" is Ok(vec![]) / Ok(None).   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use lightbnb_core::CoreError;
use thiserror::Error;

/// SQLSTATE raised when a statement is cancelled (e.g. `statement_timeout`).
const QUERY_CANCELED: &str = "57014";

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Registering an email that already exists
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Creating a property for an owner that doesn't exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Server unreachable or refused the credentials at startup
    /// - Connection lost mid-query
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed (syntax, type mismatch, other constraint).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Query did not finish in time (client-side timeout or server
    /// `statement_timeout`).
    #[error("Query timed out")]
    Timeout,

    /// Pool exhausted (all connections in use past the acquire timeout).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A configuration value could not be parsed.
    #[error("Invalid configuration for {0}")]
    InvalidConfig(String),

    /// Caller passed input the query builder rejects.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True for failures worth retrying on a fresh connection.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionFailed(_) | DbError::PoolExhausted | DbError::Timeout
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound         → DbError::NotFound
/// Database, unique (23505)         → DbError::UniqueViolation
/// Database, foreign key (23503)    → DbError::ForeignKeyViolation
/// Database, cancelled (57014)      → DbError::Timeout
/// Database, anything else          → DbError::QueryFailed
/// Io / PoolClosed                  → DbError::ConnectionFailed
/// PoolTimedOut                     → DbError::PoolExhausted
/// Other                            → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    DbError::UniqueViolation {
                        constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                    }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation {
                        message: db_err.message().to_string(),
                    }
                } else if db_err.code().as_deref() == Some(QUERY_CANCELED) {
                    DbError::Timeout
                } else {
                    DbError::QueryFailed(db_err.message().to_string())
                }
            }

            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
                DbError::QueryFailed(err.to_string())
            }

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
