//! Session trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// One physical connection plus at most one open transaction
///
/// Every query and statement is routed to the open transaction when there is
/// one, and to the raw connection otherwise.
#[async_trait]
pub trait Session: Send {
    /// Run a query, returning whether it produced at least one row
    async fn fetch_any(&mut self, sql: &str) -> DbResult<bool>;

    /// Execute SQL (possibly several `;`-separated statements)
    async fn execute(&mut self, sql: &str) -> DbResult<()>;

    /// Open the transaction subsequent calls are routed to
    async fn begin(&mut self) -> DbResult<()>;

    /// Roll back and discard the open transaction
    async fn rollback(&mut self) -> DbResult<()>;

    /// Whether a transaction is currently open
    fn in_transaction(&self) -> bool;

    /// Release the physical connection
    async fn close(&mut self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
