//! PostgreSQL session backed by sqlx

use crate::error::{DbError, DbResult};
use crate::traits::Session;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool, Postgres, Transaction};

/// PostgreSQL session
///
/// Holds a single-connection pool so the wrapping transaction and every
/// statement share one physical connection.
pub struct PostgresSession {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresSession {
    /// Open a connection from a `postgres://` URL
    pub async fn connect(url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { pool, tx: None })
    }
}

#[async_trait]
impl Session for PostgresSession {
    async fn fetch_any(&mut self, sql: &str) -> DbResult<bool> {
        // &str queries go over the simple query protocol, so multi-statement
        // text is accepted here as well as in `execute`.
        let row = match self.tx.as_mut() {
            Some(tx) => (&mut **tx).fetch_optional(sql).await?,
            None => self.pool.fetch_optional(sql).await?,
        };
        Ok(row.is_some())
    }

    async fn execute(&mut self, sql: &str) -> DbResult<()> {
        match self.tx.as_mut() {
            Some(tx) => (&mut **tx).execute(sql).await?,
            None => self.pool.execute(sql).await?,
        };
        Ok(())
    }

    async fn begin(&mut self) -> DbResult<()> {
        if self.tx.is_some() {
            return Err(DbError::TransactionError(
                "a transaction is already open".to_string(),
            ));
        }
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;
        self.tx = Some(tx);
        Ok(())
    }

    async fn rollback(&mut self) -> DbResult<()> {
        let tx = self.tx.take().ok_or(DbError::NoTransaction)?;
        tx.rollback()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))
    }

    fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    async fn close(&mut self) -> DbResult<()> {
        self.tx = None;
        self.pool.close().await;
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "postgres"
    }
}
