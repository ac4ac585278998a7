//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use sqlow_core::Engine;
use std::path::PathBuf;

/// sqlow - Conditional SQL migrations driven by YAML documents
#[derive(Parser, Debug)]
#[command(name = "sqlow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the connection config file
    #[arg(short, long, global = true, default_value = "./config.yml")]
    pub config: PathBuf,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the migrations in a file or directory
    Run(RunArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Migration document, or a directory of them with --recursive
    pub path: PathBuf,

    /// Walk directories for .yml/.yaml documents
    #[arg(short, long)]
    pub recursive: bool,

    /// Run inside a transaction that is always rolled back and print the
    /// statements that would be applied
    #[arg(short, long)]
    pub dry_run: bool,

    /// Warn about unparsable documents and continue instead of failing
    #[arg(long)]
    pub skip_invalid: bool,

    /// Connection overrides
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Connection settings that override the config file
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Database engine (postgres, mariadb, mysql)
    #[arg(short, long)]
    pub engine: Option<Engine>,

    /// Database host
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Database port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Database (schema) name
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Database user
    #[arg(short, long)]
    pub username: Option<String>,

    /// Database password
    #[arg(short, long, env = "SQLOW_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Extra connection options as comma-separated key:value pairs
    #[arg(short, long)]
    pub options: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
