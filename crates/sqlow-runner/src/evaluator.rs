//! Branch evaluation: predicates to terminal state to statements

use crate::error::RunResult;
use sqlow_core::Migration;
use sqlow_db::{ConnectionHandle, DbError};

/// Classification of a migration's predicate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    /// A predicate errored
    Failed,
    /// A predicate succeeded without rows
    Empty,
    /// Every predicate succeeded with rows, or there were none
    Satisfied,
}

impl TerminalState {
    /// Whether `onFail` applies
    pub fn runs_on_fail(&self) -> bool {
        matches!(self, TerminalState::Failed)
    }

    /// Whether `onSuccess` applies (no predicate errored)
    pub fn runs_on_success(&self) -> bool {
        !self.runs_on_fail()
    }

    /// Whether `onNoResults` applies
    pub fn runs_on_no_results(&self) -> bool {
        matches!(self, TerminalState::Empty)
    }

    /// Whether `onResults` applies
    pub fn runs_on_results(&self) -> bool {
        matches!(self, TerminalState::Satisfied)
    }
}

impl std::fmt::Display for TerminalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalState::Failed => write!(f, "failed"),
            TerminalState::Empty => write!(f, "empty"),
            TerminalState::Satisfied => write!(f, "satisfied"),
        }
    }
}

/// Terminal state of a migration together with the statements it selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub state: TerminalState,
    pub statements: Vec<String>,
}

impl Branch {
    /// Evaluate a migration's predicates and select its statements
    pub async fn collect(migration: &Migration, handle: &mut ConnectionHandle) -> RunResult<Self> {
        let state = evaluate_checks(&migration.check, handle).await?;
        log::debug!("'{}' evaluated as {}", migration.description, state);
        Ok(Self {
            state,
            statements: select_statements(migration, state),
        })
    }
}

/// Run predicates in order and classify the outcome
///
/// Stops at the first predicate that errors or returns no rows. An empty
/// predicate list is [`TerminalState::Satisfied`]. Under dry-run each
/// predicate runs behind the checkpoint, which is rolled back when the
/// predicate errors and released otherwise.
pub async fn evaluate_checks(
    checks: &[String],
    handle: &mut ConnectionHandle,
) -> RunResult<TerminalState> {
    let dry_run = handle.is_dry_run();

    for check in checks {
        if dry_run {
            warn_on_checkpoint_error(handle.savepoint().await)?;
        }

        let outcome = handle.query_passes(check).await;

        if !outcome.ok {
            if dry_run {
                log::info!("Loading savepoint...");
                warn_on_checkpoint_error(handle.loadpoint().await)?;
            }
            return Ok(TerminalState::Failed);
        }

        if dry_run {
            warn_on_checkpoint_error(handle.release().await)?;
        }

        if !outcome.has_rows {
            return Ok(TerminalState::Empty);
        }
    }

    Ok(TerminalState::Satisfied)
}

/// Concatenate the categories a terminal state selects
///
/// Order is always `onFail, onSuccess, onNoResults, onResults, always`.
pub fn select_statements(migration: &Migration, state: TerminalState) -> Vec<String> {
    let categories = [
        (state.runs_on_fail(), &migration.on_fail),
        (state.runs_on_success(), &migration.on_success),
        (state.runs_on_no_results(), &migration.on_no_results),
        (state.runs_on_results(), &migration.on_results),
        (true, &migration.always),
    ];

    categories
        .into_iter()
        .filter(|(applies, _)| *applies)
        .flat_map(|(_, statements)| statements.iter().cloned())
        .collect()
}

/// Database-side checkpoint failures are warnings; misuse is propagated
fn warn_on_checkpoint_error(result: Result<(), DbError>) -> RunResult<()> {
    match result {
        Err(DbError::Checkpoint(message)) => {
            log::warn!("{}", message);
            Ok(())
        }
        other => Ok(other?),
    }
}

#[cfg(test)]
#[path = "evaluator_test.rs"]
mod tests;
