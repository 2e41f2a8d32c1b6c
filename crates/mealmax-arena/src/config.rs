//! Configuration loading for the arena binary.
//!
//! Configuration is read from a YAML file whose path comes from
//! `MEALMAX_CONFIG` (default `mealmax.yaml`). A missing default file is not
//! an error: every field has a default. Environment variables override the
//! file for the values that differ between deployments:
//!
//! - `DATABASE_URL` -- overrides `database.url`
//! - `RANDOM_ORG_URL` -- overrides `random.url`
//! - `RANDOM_TIMEOUT_SECS` -- overrides `random.timeout_secs`

use std::path::Path;
use std::time::Duration;

use mealmax_battle::{DEFAULT_RANDOM_ORG_URL, RandomOrgConfig};
use mealmax_db::PostgresConfig;
use serde::Deserialize;

use crate::error::ArenaError;

/// Config file used when `MEALMAX_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "mealmax.yaml";

/// Top-level arena configuration. Mirrors the structure of `mealmax.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// `PostgreSQL` connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Random source settings.
    #[serde(default)]
    pub random: RandomConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL. Required; usually supplied via `DATABASE_URL`.
    pub url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Pool acquire timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
            connect_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Pool configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Config`] when no URL is set.
    pub fn postgres(&self) -> Result<PostgresConfig, ArenaError> {
        if self.url.trim().is_empty() {
            return Err(ArenaError::Config(
                "database.url is required (set it in the config file or DATABASE_URL)".to_owned(),
            ));
        }
        Ok(PostgresConfig::new(&self.url)
            .with_max_connections(self.max_connections)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs)))
    }
}

/// random.org client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Request URL.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RANDOM_ORG_URL.to_owned(),
            timeout_secs: 5,
        }
    }
}

impl RandomConfig {
    /// Client configuration for [`mealmax_battle::RandomOrgClient`].
    pub fn client_config(&self) -> RandomOrgConfig {
        RandomOrgConfig::default()
            .with_url(&self.url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

impl ArenaConfig {
    /// Load configuration from `MEALMAX_CONFIG` (or `mealmax.yaml`) and
    /// apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Config`] if an explicitly named file cannot be
    /// read, the YAML is invalid, or an override does not parse.
    pub fn load() -> Result<Self, ArenaError> {
        let explicit = std::env::var("MEALMAX_CONFIG").ok();
        let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let mut config = if explicit.is_some() || Path::new(path).exists() {
            Self::from_file(Path::new(path))?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a YAML file, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ArenaError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ArenaError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Config`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ArenaError> {
        serde_yml::from_str(yaml)
            .map_err(|e| ArenaError::Config(format!("failed to parse config YAML: {e}")))
    }

    /// Apply overrides looked up through `lookup` (the process environment
    /// in production).
    fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ArenaError> {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(url) = lookup("RANDOM_ORG_URL") {
            self.random.url = url;
        }
        if let Some(secs) = lookup("RANDOM_TIMEOUT_SECS") {
            self.random.timeout_secs = secs
                .parse()
                .map_err(|e| ArenaError::Config(format!("invalid RANDOM_TIMEOUT_SECS: {e}")))?;
        }
        Ok(())
    }
}
