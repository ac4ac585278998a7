//! sqlow-runner - Migration execution for sqlow
//!
//! This crate evaluates each migration's predicates into a terminal state,
//! selects the statements that state calls for, and runs them in order
//! through a [`sqlow_db::ConnectionHandle`].

pub mod error;
pub mod evaluator;
pub mod runner;

pub use error::{RunError, RunResult};
pub use evaluator::{evaluate_checks, select_statements, Branch, TerminalState};
pub use runner::{MigrationRunner, RunSummary};
