//! In-memory session for tests
//!
//! [`FakeDatabase`] keeps the statements that were durably applied and a log
//! of every call made by any [`RecordingSession`] opened against it. Sessions
//! model the wrapping transaction and the savepoint: statements executed in a
//! transaction are only visible until it is rolled back.

use crate::error::{DbError, DbResult};
use crate::traits::Session;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// A call observed by a [`RecordingSession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Query(String),
    Execute(String),
    Begin,
    Rollback,
    Close,
}

/// Scripted result of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Succeeds with at least one row
    Rows,
    /// Succeeds with no rows
    Empty,
    /// Fails with an execution error
    Error,
    /// Returns rows once a statement containing the text has been applied
    /// (committed, or pending in the open transaction)
    RowsOnceApplied(String),
}

#[derive(Debug, Default)]
struct State {
    committed: Vec<String>,
    calls: Vec<Call>,
}

/// Shared state behind any number of sessions
#[derive(Debug, Clone, Default)]
pub struct FakeDatabase {
    state: Arc<Mutex<State>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a new session against this database
    pub fn session(&self) -> RecordingSession {
        RecordingSession {
            db: self.clone(),
            pending: None,
            savepoint: None,
            outcomes: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Queries issued so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Query(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    /// Statements executed so far, in order, excluding savepoint management
    pub fn executions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Execute(sql) if !is_checkpoint_sql(&sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    /// Number of times a query was issued
    pub fn query_count(&self, sql: &str) -> usize {
        self.queries().iter().filter(|q| q.as_str() == sql).count()
    }

    /// Statements durably applied outside any transaction
    pub fn committed(&self) -> Vec<String> {
        self.lock().committed.clone()
    }

    /// Forget the call log, keeping committed state
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

fn is_checkpoint_sql(sql: &str) -> bool {
    sql.starts_with("SAVEPOINT ")
        || sql.starts_with("ROLLBACK TO SAVEPOINT ")
        || sql.starts_with("RELEASE SAVEPOINT ")
}

/// Scriptable [`Session`] recording every call into its [`FakeDatabase`]
///
/// Unscripted queries succeed with rows.
#[derive(Debug)]
pub struct RecordingSession {
    db: FakeDatabase,
    pending: Option<Vec<String>>,
    savepoint: Option<usize>,
    outcomes: HashMap<String, Outcome>,
    failing: HashSet<String>,
}

impl RecordingSession {
    /// Script the outcome of a query
    pub fn with_outcome(mut self, sql: &str, outcome: Outcome) -> Self {
        self.outcomes.insert(sql.to_string(), outcome);
        self
    }

    /// Make executing exactly `sql` fail
    pub fn failing_execute(mut self, sql: &str) -> Self {
        self.failing.insert(sql.to_string());
        self
    }

    fn record(&self, call: Call) {
        self.db.lock().calls.push(call);
    }

    fn is_applied(&self, needle: &str) -> bool {
        let visible = self.db.lock().committed.iter().any(|s| s.contains(needle));
        visible
            || self
                .pending
                .as_ref()
                .is_some_and(|p| p.iter().any(|s| s.contains(needle)))
    }

    fn apply_checkpoint(&mut self, sql: &str) -> DbResult<()> {
        let pending = self
            .pending
            .as_mut()
            .ok_or_else(|| DbError::ExecutionError("savepoint outside transaction".into()))?;
        if sql.starts_with("SAVEPOINT ") {
            self.savepoint = Some(pending.len());
        } else if sql.starts_with("ROLLBACK TO SAVEPOINT ") {
            let mark = self
                .savepoint
                .ok_or_else(|| DbError::ExecutionError("savepoint does not exist".into()))?;
            pending.truncate(mark);
        } else {
            self.savepoint = None;
        }
        Ok(())
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn fetch_any(&mut self, sql: &str) -> DbResult<bool> {
        self.record(Call::Query(sql.to_string()));
        match self.outcomes.get(sql).cloned().unwrap_or(Outcome::Rows) {
            Outcome::Rows => Ok(true),
            Outcome::Empty => Ok(false),
            Outcome::Error => Err(DbError::ExecutionError(format!("scripted failure: {}", sql))),
            Outcome::RowsOnceApplied(needle) => Ok(self.is_applied(&needle)),
        }
    }

    async fn execute(&mut self, sql: &str) -> DbResult<()> {
        self.record(Call::Execute(sql.to_string()));
        if self.failing.contains(sql) {
            return Err(DbError::ExecutionError(format!("scripted failure: {}", sql)));
        }
        if is_checkpoint_sql(sql) {
            return self.apply_checkpoint(sql);
        }
        match self.pending.as_mut() {
            Some(pending) => pending.push(sql.to_string()),
            None => self.db.lock().committed.push(sql.to_string()),
        }
        Ok(())
    }

    async fn begin(&mut self) -> DbResult<()> {
        self.record(Call::Begin);
        if self.pending.is_some() {
            return Err(DbError::TransactionError("already open".into()));
        }
        self.pending = Some(Vec::new());
        Ok(())
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.record(Call::Rollback);
        self.savepoint = None;
        self.pending.take().map(|_| ()).ok_or(DbError::NoTransaction)
    }

    fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }

    async fn close(&mut self) -> DbResult<()> {
        self.record(Call::Close);
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "fake"
    }
}
