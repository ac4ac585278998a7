//! Connection handle: one live connection, an optional dry-run transaction,
//! and a capacity-1 checkpoint

use crate::error::{DbError, DbResult};
use crate::mysql::MySqlSession;
use crate::postgres::PostgresSession;
use crate::traits::Session;
use sqlow_core::engine::EngineFamily;
use sqlow_core::{Config, CoreError, Engine};

/// Predicate used to validate a fresh connection
pub const SENTINEL_QUERY: &str = "select 1;";

/// Fixed name of the single checkpoint
pub const CHECKPOINT_NAME: &str = "sqlow_save";

/// Outcome of running a read query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOutcome {
    /// The query executed without error
    pub ok: bool,
    /// The query succeeded and produced at least one row
    pub has_rows: bool,
}

/// Owns the live connection for one run
///
/// In dry-run mode a wrapping transaction is opened on connect and always
/// rolled back on [`close`](Self::close); there is no commit path.
pub struct ConnectionHandle {
    engine: Engine,
    dry_run: bool,
    session: Box<dyn Session>,
    checkpoint_open: bool,
}

impl ConnectionHandle {
    /// Open the engine-specific connection described by `config`
    ///
    /// The configuration is validated before any connection attempt, so an
    /// engine that cannot dry-run is rejected without contacting a database.
    pub async fn connect(config: &Config, dry_run: bool) -> DbResult<Self> {
        config.validate(dry_run)?;
        log::info!("Making {} driver...", config.engine);

        let url = config.connection_url()?;
        let session: Box<dyn Session> = match config.engine.capabilities().family {
            EngineFamily::Postgres => Box::new(PostgresSession::connect(&url).await?),
            EngineFamily::MySql => Box::new(MySqlSession::connect(&url).await?),
        };
        Self::open(config.engine, dry_run, session).await
    }

    /// Wrap an already-connected session
    ///
    /// Validates the connection with [`SENTINEL_QUERY`] and, in dry-run mode,
    /// begins the wrapping transaction.
    pub async fn open(engine: Engine, dry_run: bool, session: Box<dyn Session>) -> DbResult<Self> {
        if dry_run && !engine.capabilities().dry_run {
            return Err(CoreError::DryRunUnsupported {
                engine: engine.to_string(),
            }
            .into());
        }

        let mut handle = Self {
            engine,
            dry_run,
            session,
            checkpoint_open: false,
        };

        let outcome = handle.query_passes(SENTINEL_QUERY).await;
        if !outcome.ok || !outcome.has_rows {
            return Err(DbError::ConnectionError(format!(
                "Unable to connect to {} database",
                engine
            )));
        }

        if dry_run {
            log::info!("Beginning transaction...");
            handle.session.begin().await?;
        }
        Ok(handle)
    }

    /// Engine this handle is connected to
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Whether statements run inside the discarded wrapping transaction
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether the wrapping transaction is open
    pub fn in_transaction(&self) -> bool {
        self.session.in_transaction()
    }

    /// Run a read query against the current execution context
    ///
    /// Any error (syntax, permission, connectivity) yields `ok == false`.
    pub async fn query_passes(&mut self, sql: &str) -> QueryOutcome {
        match self.session.fetch_any(sql).await {
            Ok(has_rows) => QueryOutcome { ok: true, has_rows },
            Err(e) => {
                log::debug!("{} query failed: {}", self.session.db_type(), e);
                QueryOutcome {
                    ok: false,
                    has_rows: false,
                }
            }
        }
    }

    /// Execute an ordered batch of statements
    ///
    /// Engines with multi-statement exec receive the whole batch as one call.
    /// Otherwise statements run one at a time and the first failure is
    /// returned without running the rest.
    pub async fn execute_batch(&mut self, statements: &[String]) -> DbResult<()> {
        if statements.is_empty() {
            return Ok(());
        }

        if self.engine.capabilities().multi_statement_exec {
            return self.session.execute(&statements.concat()).await;
        }

        for statement in statements {
            self.session.execute(statement).await?;
        }
        Ok(())
    }

    /// Create the checkpoint inside the wrapping transaction
    ///
    /// Fails with [`DbError::CheckpointOutstanding`] if the previous
    /// checkpoint was neither loaded nor released.
    pub async fn savepoint(&mut self) -> DbResult<()> {
        self.require_transaction()?;
        if self.checkpoint_open {
            return Err(DbError::CheckpointOutstanding(CHECKPOINT_NAME));
        }
        self.checkpoint_sql(&format!("SAVEPOINT {};", CHECKPOINT_NAME))
            .await?;
        self.checkpoint_open = true;
        Ok(())
    }

    /// Roll back to the checkpoint, resolving it
    pub async fn loadpoint(&mut self) -> DbResult<()> {
        self.take_checkpoint()?;
        self.checkpoint_sql(&format!("ROLLBACK TO SAVEPOINT {};", CHECKPOINT_NAME))
            .await
    }

    /// Keep the work done since the checkpoint, resolving it
    pub async fn release(&mut self) -> DbResult<()> {
        self.take_checkpoint()?;
        self.checkpoint_sql(&format!("RELEASE SAVEPOINT {};", CHECKPOINT_NAME))
            .await
    }

    /// Discard the wrapping transaction (dry-run) and release the connection
    ///
    /// Teardown failures are logged and never abort shutdown.
    pub async fn close(mut self) {
        if self.dry_run {
            log::info!("Rolling back transaction...");
            if let Err(e) = self.session.rollback().await {
                log::warn!("{}", e);
            }
        }
        log::info!("Closing {} driver...", self.engine);
        if let Err(e) = self.session.close().await {
            log::warn!("{}", e);
        }
        log::info!("Closed {} driver.", self.engine);
    }

    fn require_transaction(&self) -> DbResult<()> {
        if self.session.in_transaction() {
            Ok(())
        } else {
            Err(DbError::NoTransaction)
        }
    }

    fn take_checkpoint(&mut self) -> DbResult<()> {
        self.require_transaction()?;
        if !std::mem::take(&mut self.checkpoint_open) {
            return Err(DbError::Checkpoint(format!(
                "no checkpoint '{}' is outstanding",
                CHECKPOINT_NAME
            )));
        }
        Ok(())
    }

    async fn checkpoint_sql(&mut self, sql: &str) -> DbResult<()> {
        self.session
            .execute(sql)
            .await
            .map_err(|e| DbError::Checkpoint(e.to_string()))
    }
}

#[cfg(test)]
#[path = "handle_test.rs"]
mod tests;
