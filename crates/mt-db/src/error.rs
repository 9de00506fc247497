//! Error types for mt-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Target database does not exist (D003)
    #[error("[D003] Database not found: {0}")]
    DatabaseNotFound(String),

    /// BEGIN / COMMIT / ROLLBACK failed (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Version tracking storage cannot be reached (D005)
    #[error("[D005] Version tracking unavailable: {0}")]
    TrackingUnavailable(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (D007)
    #[error("[D007] Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether repeating the operation might succeed.
    ///
    /// The driver does not separate transient failures from deterministic
    /// ones (a syntax error and a dropped connection both surface as
    /// execution errors), so every connection, execution and transaction
    /// failure counts as retryable. Missing databases and internal failures
    /// do not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionError(_) | DbError::ExecutionError(_) | DbError::TransactionError(_)
        )
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for IO and lock
        // failures, so classify by message.
        let msg = err.to_string();
        if msg.contains("IO Error") || msg.contains("Could not set lock") {
            DbError::ConnectionError(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
