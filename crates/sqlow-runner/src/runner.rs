//! Migration execution

use crate::error::{RunError, RunResult};
use crate::evaluator::{Branch, TerminalState};
use sqlow_core::Migration;
use sqlow_db::ConnectionHandle;
use std::io::Write;

/// Summary of a migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Migrations processed
    pub total: usize,

    /// Migrations that selected at least one statement
    pub applied: usize,

    /// Migrations whose predicates errored
    pub failed_checks: usize,

    /// Migrations whose predicates returned no rows
    pub empty: usize,

    /// Migrations whose predicates all returned rows
    pub satisfied: usize,
}

impl RunSummary {
    fn record(&mut self, branch: &Branch) {
        self.total += 1;
        if !branch.statements.is_empty() {
            self.applied += 1;
        }
        match branch.state {
            TerminalState::Failed => self.failed_checks += 1,
            TerminalState::Empty => self.empty += 1,
            TerminalState::Satisfied => self.satisfied += 1,
        }
    }
}

impl std::ops::AddAssign for RunSummary {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.applied += other.applied;
        self.failed_checks += other.failed_checks;
        self.empty += other.empty;
        self.satisfied += other.satisfied;
    }
}

/// Runs migrations in order through one connection handle
pub struct MigrationRunner<'a> {
    handle: &'a mut ConnectionHandle,
}

impl<'a> MigrationRunner<'a> {
    /// Create a new migration runner
    pub fn new(handle: &'a mut ConnectionHandle) -> Self {
        Self { handle }
    }

    /// Run every migration in order
    ///
    /// In normal mode each migration that selects statements is logged as
    /// progress. In dry-run mode its description and statements are collected
    /// and written to `out` once all migrations have executed inside the
    /// wrapping transaction. The first failing batch aborts the run.
    pub async fn run_all<W: Write>(
        &mut self,
        migrations: &[Migration],
        out: &mut W,
    ) -> RunResult<RunSummary> {
        let dry_run = self.handle.is_dry_run();
        let mut preview: Vec<String> = Vec::new();
        let mut summary = RunSummary::default();

        for migration in migrations {
            let branch = Branch::collect(migration, self.handle).await?;
            summary.record(&branch);

            if !branch.statements.is_empty() {
                if dry_run {
                    preview.push(format!("\n-- {}", migration.description));
                    preview.extend(branch.statements.iter().cloned());
                } else {
                    log::info!("  - {}", migration.description);
                }
            }

            self.handle
                .execute_batch(&branch.statements)
                .await
                .map_err(|source| RunError::Execution {
                    description: migration.description.clone(),
                    source,
                })?;
        }

        if dry_run {
            for line in &preview {
                writeln!(out, "{}", line)?;
            }
            out.flush()?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
