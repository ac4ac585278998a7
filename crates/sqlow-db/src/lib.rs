//! sqlow-db - Database layer for sqlow
//!
//! This crate provides the [`ConnectionHandle`] that owns one live connection
//! per run, the [`Session`] trait routing statements to either the raw
//! connection or the dry-run transaction, and PostgreSQL and MySQL sessions
//! backed by sqlx.

pub mod error;
pub mod handle;
pub mod mysql;
pub mod postgres;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{DbError, DbResult};
pub use handle::{ConnectionHandle, QueryOutcome, CHECKPOINT_NAME, SENTINEL_QUERY};
pub use mysql::MySqlSession;
pub use postgres::PostgresSession;
pub use traits::Session;
