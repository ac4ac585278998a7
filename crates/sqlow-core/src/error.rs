//! Error types for sqlow-core

use thiserror::Error;

/// Core error type for sqlow
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Unsupported engine identifier
    #[error("[C001] Unsupported engine type: {engine}")]
    UnsupportedEngine { engine: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Engine cannot run in dry-run mode
    #[error(
        "[C004] {engine} doesn't support dry-runs as it can implicitly end transactions \
         (see https://mariadb.com/kb/en/sql-statements-that-cause-an-implicit-commit/ and \
         https://dev.mysql.com/doc/refman/8.0/en/implicit-commit.html)"
    )]
    DryRunUnsupported { engine: String },

    /// C005: Failed to parse a migration document
    #[error("[C005] Failed to parse migration document {path}: {message}")]
    DocumentParseError { path: String, message: String },

    /// C006: Migration is missing its description
    #[error("[C006] Migration #{index} in {path} has no description")]
    MissingDescription { path: String, index: usize },

    /// C007: Migration path not found
    #[error("[C007] Migration path not found: {path}")]
    PathNotFound { path: String },

    /// C008: IO error with file path context
    #[error("[C008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C009: Directory traversal error
    #[error("[C009] Failed to traverse {path}: {message}")]
    Traversal { path: String, message: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
