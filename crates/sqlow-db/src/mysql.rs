//! MySQL-family session backed by sqlx

use crate::error::{DbError, DbResult};
use crate::traits::Session;
use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{Executor, MySql, MySqlPool, Transaction};

/// MySQL and MariaDB session
///
/// Holds a single-connection pool so the wrapping transaction and every
/// statement share one physical connection.
pub struct MySqlSession {
    pool: MySqlPool,
    tx: Option<Transaction<'static, MySql>>,
}

impl MySqlSession {
    /// Open a connection from a `mysql://` URL
    pub async fn connect(url: &str) -> DbResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { pool, tx: None })
    }
}

#[async_trait]
impl Session for MySqlSession {
    async fn fetch_any(&mut self, sql: &str) -> DbResult<bool> {
        // &str queries use the text protocol, which also accepts statements
        // that cannot be prepared.
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
        "mysql"
    }
}
