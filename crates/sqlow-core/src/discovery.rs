//! Migration file discovery

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check whether a path names a migration document (`.yml` / `.yaml`)
pub fn is_migration_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yml" || ext == "yaml")
}

/// Collect the migration documents to run, in execution order
///
/// Without `recursive`, `path` is treated as a single document. With it, every
/// YAML file below `path` is returned, sorted by file name at each level.
pub fn discover_migration_files(path: &Path, recursive: bool) -> CoreResult<Vec<PathBuf>> {
    if !path.exists() {
        return Err(CoreError::PathNotFound {
            path: path.display().to_string(),
        });
    }

    if !recursive {
        log::info!("Getting {}...", path.display());
        if path.is_dir() {
            log::warn!(
                "{} is a directory; pass --recursive to run the migrations inside it",
                path.display()
            );
            return Ok(Vec::new());
        }
        if !is_migration_file(path) {
            log::warn!("Skipping {}: not a .yml or .yaml file", path.display());
            return Ok(Vec::new());
        }
        return Ok(vec![path.to_path_buf()]);
    }

    log::info!("Getting all files in {}...", path.display());
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| CoreError::Traversal {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && is_migration_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
