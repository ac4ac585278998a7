//! Run command implementation

use anyhow::{Context, Result};
use sqlow_core::{
    discover_migration_files, Config, ConfigOverrides, CoreError, Migration, MigrationDocument,
};
use sqlow_db::ConnectionHandle;
use sqlow_runner::{MigrationRunner, RunSummary};
use std::io::Write;
use std::path::PathBuf;

use crate::cli::{ConnectionArgs, GlobalArgs, RunArgs};

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    log::info!("Started.");

    let config = resolve_config(global, &args.connection)?;
    config.validate(args.dry_run)?;

    let files = discover_migration_files(&args.path, args.recursive)
        .with_context(|| format!("Failed to discover migrations at {}", args.path.display()))?;

    let documents = load_documents(&files, args.skip_invalid)?;

    let mut handle = ConnectionHandle::connect(&config, args.dry_run)
        .await
        .context("Failed to open database connection")?;

    let result = run_documents(&documents, &mut handle, &mut std::io::stdout()).await;
    handle.close().await;
    let summary = result?;

    log::debug!(
        "{} migrations evaluated, {} applied ({} failed checks, {} empty, {} satisfied)",
        summary.total,
        summary.applied,
        summary.failed_checks,
        summary.empty,
        summary.satisfied
    );
    log::info!("Done!");
    Ok(())
}

/// Merge the config file with the command-line overrides
fn resolve_config(global: &GlobalArgs, connection: &ConnectionArgs) -> Result<Config> {
    let base = Config::load_or_default(&global.config)?;
    let options = match &connection.options {
        Some(raw) => ConfigOverrides::parse_options(raw)?,
        None => Vec::new(),
    };
    Ok(base.with_overrides(ConfigOverrides {
        engine: connection.engine,
        host: connection.host.clone(),
        port: connection.port,
        schema: connection.schema.clone(),
        username: connection.username.clone(),
        password: Some(connection.password.clone()),
        options,
    }))
}

/// A loaded migration document
#[derive(Debug)]
struct Document {
    path: PathBuf,
    migrations: Vec<Migration>,
}

/// Load every migration document up front
///
/// The first unparsable document aborts the run unless `skip_invalid` is
/// set, in which case it is reported and skipped. Unreadable files, including
/// referenced SQL files, always abort. Nothing has touched the database when
/// this returns an error.
fn load_documents(files: &[PathBuf], skip_invalid: bool) -> Result<Vec<Document>> {
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        match MigrationDocument::load(path) {
            Ok(migrations) => documents.push(Document {
                path: path.clone(),
                migrations,
            }),
            Err(e @ (CoreError::DocumentParseError { .. } | CoreError::MissingDescription { .. }))
                if skip_invalid =>
            {
                log::warn!("Skipping {}: {}", path.display(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(documents)
}

/// Run each document's migrations in order through one handle
async fn run_documents<W: Write>(
    documents: &[Document],
    handle: &mut ConnectionHandle,
    out: &mut W,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for document in documents {
        summary += MigrationRunner::new(handle)
            .run_all(&document.migrations, out)
            .await
            .with_context(|| format!("Failed to run migrations in {}", document.path.display()))?;
    }
    Ok(summary)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
