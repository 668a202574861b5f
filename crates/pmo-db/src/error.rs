//! Database error types for pmo-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Caller passed a value the store refuses to persist.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend could not be reached at all.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether retrying the same operation could succeed.
    ///
    /// Only infrastructure hiccups qualify. SQL, constraint and data errors
    /// are never retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::LibSql(e) => crate::retry::is_transient_libsql_error(e),
            _ => false,
        }
    }
}
