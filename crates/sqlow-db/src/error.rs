//! Error types for sqlow-db

use sqlow_core::CoreError;
use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction begin/rollback error (D003)
    #[error("[D003] Transaction error: {0}")]
    TransactionError(String),

    /// Savepoint create/rollback/release error (D004)
    #[error("[D004] Checkpoint failed: {0}")]
    Checkpoint(String),

    /// A second checkpoint was requested before the first was resolved (D005)
    #[error("[D005] Checkpoint '{0}' is still outstanding")]
    CheckpointOutstanding(&'static str),

    /// A checkpoint operation was attempted outside a transaction (D006)
    #[error("[D006] No active transaction for checkpoint")]
    NoTransaction,

    /// Configuration rejected before connecting
    #[error(transparent)]
    Config(#[from] CoreError),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DbError::ConnectionError(err.to_string()),
            _ => DbError::ExecutionError(err.to_string()),
        }
    }
}
