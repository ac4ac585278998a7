//! sqlow-core - Core library for sqlow
//!
//! This crate provides the configuration model, the closed set of supported
//! database engines, migration definitions and their document loader, and
//! migration file discovery shared by the other sqlow crates.

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod migration;
pub(crate) mod serde_helpers;

pub use config::{Config, ConfigOverrides};
pub use discovery::discover_migration_files;
pub use engine::{Engine, EngineCapabilities};
pub use error::{CoreError, CoreResult};
pub use migration::{normalize_statement, Migration, MigrationDocument};
