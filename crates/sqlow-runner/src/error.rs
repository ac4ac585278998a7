//! Error types for sqlow-runner

use sqlow_db::DbError;
use thiserror::Error;

/// Migration run errors
#[derive(Error, Debug)]
pub enum RunError {
    /// A selected batch failed; the remaining migrations are not run (R001)
    #[error("[R001] Migration '{description}' failed: {source}")]
    Execution {
        description: String,
        #[source]
        source: DbError,
    },

    /// The dry-run preview could not be written (R002)
    #[error("[R002] Failed to write dry-run preview: {0}")]
    Output(#[from] std::io::Error),

    /// Checkpoint misuse or other database error during evaluation
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;
