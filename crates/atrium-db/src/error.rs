//! # Storage Error Types
//!
//! The small error taxonomy every storage caller sees.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Maps to the portal taxonomy                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in portal-api) ← JSON envelope with status + code           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays the human-readable message                          │
//! │                                                                         │
//! │  Callers NEVER see backend-specific exception types.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Storage operation errors.
///
/// This is the complete taxonomy the data-access layer raises: conditional
/// guard trips (`AlreadyExists`/`NotFound`), reachability failures
/// (`Unavailable`), and a catch-all with the original message attached.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The create guard tripped: an item with this key already exists.
    ///
    /// Racing creates of the same key resolve with exactly one success;
    /// every loser gets this error.
    #[error("{table} item already exists: {key}")]
    AlreadyExists { table: String, key: String },

    /// The existence guard tripped: update/delete targeted a missing key.
    /// There is no upsert-by-update.
    #[error("{table} item not found: {key}")]
    NotFound { table: String, key: String },

    /// The backend could not be reached (connection, pool, I/O).
    ///
    /// This is the only variant the transport layer treats as a demotion
    /// signal; it is never retried with backoff.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// Catch-all for everything else, original message attached.
    #[error("storage operation failed: {0}")]
    OperationFailed(String),
}

impl StoreError {
    /// Creates a NotFound error for a given table and key.
    pub fn not_found(table: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Creates an AlreadyExists error for a given table and key.
    pub fn already_exists(table: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::AlreadyExists {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Stable machine-readable code, shared with the HTTP envelope.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::AlreadyExists { .. } => "ALREADY_EXISTS",
            StoreError::NotFound { .. } => "NOT_FOUND",
            StoreError::Unavailable(_) => "BACKEND_UNAVAILABLE",
            StoreError::OperationFailed(_) => "OPERATION_FAILED",
        }
    }
}

/// Convert sqlx errors to the portal taxonomy.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolTimedOut     → Unavailable
/// sqlx::Error::PoolClosed       → Unavailable
/// sqlx::Error::Io               → Unavailable
/// sqlx::Error::Database         → OperationFailed (guard trips are detected
///                                 at the call site, where table/key context
///                                 is known)
/// Other                         → OperationFailed
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::Unavailable("connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::Unavailable("pool is closed".to_string()),
            sqlx::Error::Io(e) => StoreError::Unavailable(e.to_string()),
            sqlx::Error::Database(db_err) => StoreError::OperationFailed(db_err.message().to_string()),
            other => StoreError::OperationFailed(other.to_string()),
        }
    }
}

/// Returns true when a sqlx error is a UNIQUE/PRIMARY KEY violation.
///
/// SQLite reports these as
/// `UNIQUE constraint failed: <table>.<column>`.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().contains("UNIQUE constraint failed"),
        _ => false,
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("Tickets", "t-42");
        assert_eq!(err.to_string(), "Tickets item not found: t-42");

        let err = StoreError::already_exists("Clients", "c-1");
        assert_eq!(err.to_string(), "Clients item already exists: c-1");
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(StoreError::not_found("T", "k").code(), "NOT_FOUND");
        assert_eq!(StoreError::already_exists("T", "k").code(), "ALREADY_EXISTS");
        assert_eq!(StoreError::Unavailable("x".into()).code(), "BACKEND_UNAVAILABLE");
        assert_eq!(StoreError::OperationFailed("x".into()).code(), "OPERATION_FAILED");
    }

    #[test]
    fn test_pool_errors_map_to_unavailable() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
