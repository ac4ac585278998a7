//! Connection configuration from config.yml and CLI overrides

use crate::engine::Engine;
use crate::error::{CoreError, CoreResult};
use crate::serde_helpers;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use url::Url;

/// Resolved connection configuration
///
/// The password is never read from the config file; it only arrives through
/// [`ConfigOverrides`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database engine
    #[serde(default)]
    pub engine: Engine,

    /// Database host
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port
    #[serde(default = "default_port", deserialize_with = "serde_helpers::port")]
    pub port: u16,

    /// Schema (database name) to connect to
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Database username
    #[serde(default = "default_username")]
    pub username: String,

    /// Database password
    #[serde(skip)]
    pub password: String,

    /// Engine-specific options appended to the connection string
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// Optional overrides applied on top of a loaded [`Config`]
///
/// Every field is either present (replaces the config value) or absent.
/// `options` is merged into the config's options, overriding per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub engine: Option<Engine>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub schema: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub options: Vec<(String, String)>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_schema() -> String {
    "postgres".to_string()
}

fn default_username() -> String {
    "postgres".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            host: default_host(),
            port: default_port(),
            schema: default_schema(),
            username: default_username(),
            password: String::new(),
            options: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("schema", &self.schema)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse configuration content
    ///
    /// A `password` key is ignored with a warning; the password only arrives
    /// through [`ConfigOverrides`].
    fn parse(content: &str, origin: &str) -> CoreResult<Self> {
        let parse_error = |e: serde_yaml::Error| CoreError::ConfigParseError {
            path: origin.to_string(),
            message: e.to_string(),
        };

        let mut value: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        if let Some(mapping) = value.as_mapping_mut() {
            if mapping.remove("password").is_some() {
                log::warn!(
                    "Ignoring password in {}; pass it with --password instead.",
                    origin
                );
            }
        }
        serde_yaml::from_value(value).map_err(parse_error)
    }

    /// Load configuration, falling back to the defaults when the file is missing
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            log::warn!(
                "Config file {} not found, loaded default options.",
                path.display()
            );
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        log::info!("Loaded config from {}.", path.display());
        Ok(config)
    }

    /// Return a new configuration with the overrides applied
    pub fn with_overrides(&self, overrides: ConfigOverrides) -> Config {
        let mut config = self.clone();
        if let Some(engine) = overrides.engine {
            config.engine = engine;
        }
        if let Some(host) = overrides.host {
            config.host = host;
        }
        if let Some(port) = overrides.port {
            config.port = port;
        }
        if let Some(schema) = overrides.schema {
            config.schema = schema;
        }
        if let Some(username) = overrides.username {
            config.username = username;
        }
        if let Some(password) = overrides.password {
            config.password = password;
        }
        config.options.extend(overrides.options);
        config
    }

    /// Validate the configuration for a run
    ///
    /// Rejects engines that cannot honour a dry-run before anything connects.
    pub fn validate(&self, dry_run: bool) -> CoreResult<()> {
        if dry_run && !self.engine.capabilities().dry_run {
            return Err(CoreError::DryRunUnsupported {
                engine: self.engine.to_string(),
            });
        }
        if self.host.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "host cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Build the engine-specific connection string
    pub fn connection_url(&self) -> CoreResult<String> {
        let caps = self.engine.capabilities();
        let invalid = |what: &str| CoreError::ConfigInvalid {
            message: format!("cannot build {} connection string: {}", self.engine, what),
        };

        let base = format!(
            "{}://{}:{}/{}",
            caps.scheme, self.host, self.port, self.schema
        );
        let mut url = Url::parse(&base).map_err(|e| invalid(&e.to_string()))?;
        url.set_username(&self.username)
            .map_err(|_| invalid("invalid username"))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| invalid("invalid password"))?;
        }
        if !self.options.is_empty() {
            url.query_pairs_mut().extend_pairs(self.options.iter());
        }
        Ok(url.into())
    }
}

impl ConfigOverrides {
    /// Parse a comma-separated list of `key:value` option pairs
    pub fn parse_options(raw: &str) -> CoreResult<Vec<(String, String)>> {
        raw.split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                pair.split_once(':')
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .filter(|(k, _)| !k.is_empty())
                    .ok_or_else(|| CoreError::ConfigInvalid {
                        message: format!("option '{}' is not a key:value pair", pair),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
