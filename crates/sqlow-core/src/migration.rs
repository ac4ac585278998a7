//! Migration definitions and migration document loading
//!
//! A migration document is a YAML mapping with a `migrations` key holding an
//! ordered list of migrations:
//!
//! ```yaml
//! migrations:
//!   - description: Add users table
//!     check:
//!       - select 1 from information_schema.tables where table_name = 'users'
//!     onNoResults:
//!       - create table users (id serial primary key)
//!     alwaysFile: sql/grants.sql
//! ```
//!
//! Every statement category accepts a single string or a list of strings.
//! `*File` keys name a SQL file, relative to the document's directory, whose
//! content is appended to the category after its inline statements.

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A single conditional migration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Migration {
    /// Human-readable label
    #[serde(default)]
    pub description: String,

    /// Predicate queries, evaluated in order
    #[serde(default, deserialize_with = "serde_helpers::one_or_many")]
    pub check: Vec<String>,

    /// Statements run when a predicate errors
    #[serde(default, deserialize_with = "serde_helpers::one_or_many")]
    pub on_fail: Vec<String>,

    /// Statements run when no predicate errors
    #[serde(default, deserialize_with = "serde_helpers::one_or_many")]
    pub on_success: Vec<String>,

    /// Statements run when a predicate returned no rows
    #[serde(default, deserialize_with = "serde_helpers::one_or_many")]
    pub on_no_results: Vec<String>,

    /// Statements run when every predicate returned rows
    #[serde(default, deserialize_with = "serde_helpers::one_or_many")]
    pub on_results: Vec<String>,

    /// Statements run unconditionally
    #[serde(default, deserialize_with = "serde_helpers::one_or_many")]
    pub always: Vec<String>,

    #[serde(default)]
    pub check_file: Option<PathBuf>,
    #[serde(default)]
    pub on_fail_file: Option<PathBuf>,
    #[serde(default)]
    pub on_success_file: Option<PathBuf>,
    #[serde(default)]
    pub on_no_results_file: Option<PathBuf>,
    #[serde(default)]
    pub on_results_file: Option<PathBuf>,
    #[serde(default)]
    pub always_file: Option<PathBuf>,
}

/// Top-level shape of a migration document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MigrationDocument {
    #[serde(default, deserialize_with = "serde_helpers::null_as_default")]
    pub migrations: Vec<Migration>,
}

/// Ensure a statement ends with exactly one `;`
///
/// Statements that already end with `;` (ignoring trailing whitespace) are
/// returned unchanged. When the last line carries a `--` comment the
/// terminator goes on its own line, so statements concatenated after it
/// stay outside the comment.
pub fn normalize_statement(sql: &str) -> String {
    let trimmed = sql.trim_end();
    if trimmed.ends_with(';') {
        return sql.to_string();
    }
    let last_line = trimmed.rsplit('\n').next().unwrap_or(trimmed);
    if last_line.contains("--") {
        format!("{}\n;", trimmed)
    } else {
        format!("{};", trimmed)
    }
}

fn normalize_all(statements: &mut Vec<String>) {
    statements.retain(|s| !s.trim().is_empty());
    for statement in statements.iter_mut() {
        *statement = normalize_statement(statement);
    }
}

impl Migration {
    /// Normalize statements and append the content of referenced files
    ///
    /// File paths are resolved against `dir` and replaced by the resolved path.
    fn resolve(&mut self, dir: &Path) -> CoreResult<()> {
        let Migration {
            description: _,
            check,
            on_fail,
            on_success,
            on_no_results,
            on_results,
            always,
            check_file,
            on_fail_file,
            on_success_file,
            on_no_results_file,
            on_results_file,
            always_file,
        } = self;

        let categories = [
            (check, check_file),
            (on_fail, on_fail_file),
            (on_success, on_success_file),
            (on_no_results, on_no_results_file),
            (on_results, on_results_file),
            (always, always_file),
        ];

        for (statements, file) in categories {
            normalize_all(statements);
            if let Some(relative) = file.take() {
                let resolved = dir.join(relative);
                let content =
                    std::fs::read_to_string(&resolved).map_err(|e| CoreError::IoWithPath {
                        path: resolved.display().to_string(),
                        source: e,
                    })?;
                if content.trim().is_empty() {
                    log::warn!("SQL file {} is empty", resolved.display());
                } else {
                    statements.push(normalize_statement(&content));
                }
                *file = Some(resolved);
            }
        }
        Ok(())
    }
}

impl MigrationDocument {
    /// Load and resolve every migration in a document on disk
    pub fn load(path: &Path) -> CoreResult<Vec<Migration>> {
        log::info!("Resolving migrations in {}...", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&content, dir, &path.display().to_string())
    }

    /// Parse and resolve a document's content
    ///
    /// `dir` is the directory `*File` references are relative to and `origin`
    /// names the document in error messages.
    pub fn parse(content: &str, dir: &Path, origin: &str) -> CoreResult<Vec<Migration>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: MigrationDocument =
            serde_yaml::from_str(content).map_err(|e| CoreError::DocumentParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        let mut migrations = document.migrations;
        for (index, migration) in migrations.iter_mut().enumerate() {
            if migration.description.trim().is_empty() {
                return Err(CoreError::MissingDescription {
                    path: origin.to_string(),
                    index: index + 1,
                });
            }
            migration.resolve(dir)?;
        }
        Ok(migrations)
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
