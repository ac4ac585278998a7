//! Supported database engines and their capabilities

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database engine selector
///
/// `maria` and `mariadb` are accepted as spellings of the same engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Engine {
    /// PostgreSQL (default)
    #[default]
    Postgres,
    /// MariaDB
    MariaDb,
    /// MySQL
    MySql,
}

/// Driver family an engine is served by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFamily {
    /// PostgreSQL wire protocol
    Postgres,
    /// MySQL wire protocol (MySQL and MariaDB)
    MySql,
}

/// Static description of what an engine can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCapabilities {
    /// Which driver talks to this engine
    pub family: EngineFamily,

    /// URL scheme used when building the connection string
    pub scheme: &'static str,

    /// A batch can be sent as one concatenated multi-statement exec
    pub multi_statement_exec: bool,

    /// The wrapping-transaction dry-run is sound on this engine.
    ///
    /// MySQL-family engines implicitly commit around DDL, which would leak
    /// changes out of the wrapping transaction.
    pub dry_run: bool,
}

const POSTGRES: EngineCapabilities = EngineCapabilities {
    family: EngineFamily::Postgres,
    scheme: "postgres",
    multi_statement_exec: true,
    dry_run: true,
};

const MYSQL_FAMILY: EngineCapabilities = EngineCapabilities {
    family: EngineFamily::MySql,
    scheme: "mysql",
    multi_statement_exec: false,
    dry_run: false,
};

impl Engine {
    /// Every supported engine
    pub const ALL: [Engine; 3] = [Engine::Postgres, Engine::MariaDb, Engine::MySql];

    /// Capability descriptor for this engine
    pub fn capabilities(&self) -> EngineCapabilities {
        match self {
            Engine::Postgres => POSTGRES,
            Engine::MariaDb | Engine::MySql => MYSQL_FAMILY,
        }
    }

    /// Canonical identifier, as written in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Postgres => "postgres",
            Engine::MariaDb => "mariadb",
            Engine::MySql => "mysql",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Engine::Postgres),
            "maria" | "mariadb" => Ok(Engine::MariaDb),
            "mysql" => Ok(Engine::MySql),
            other => Err(CoreError::UnsupportedEngine {
                engine: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Engine {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Engine> for String {
    fn from(engine: Engine) -> Self {
        engine.as_str().to_string()
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
