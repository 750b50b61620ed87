//! Catalog configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.
//!
//! | Variable                       | Default                 |
//! |--------------------------------|-------------------------|
//! | `CATALOG_DB_PATH`              | `database/ecommerce.db` |
//! | `CATALOG_MAX_CONNECTIONS`      | `5`                     |
//! | `CATALOG_CONNECT_TIMEOUT_SECS` | `30`                    |
//! | `CATALOG_RUN_MIGRATIONS`       | `true`                  |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::pool::DbConfig;

/// Default location of the catalog database.
pub const DEFAULT_DB_PATH: &str = "database/ecommerce.db";

/// Catalog service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,

    /// Run schema + department migrations on connect
    pub run_migrations: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            max_connections: 5,
            connect_timeout_secs: 30,
            run_migrations: true,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `load()` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CatalogConfig::default();

        let config = CatalogConfig {
            database_path: lookup("CATALOG_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: parse_or(&lookup, "CATALOG_MAX_CONNECTIONS", defaults.max_connections)?,

            connect_timeout_secs: parse_or(
                &lookup,
                "CATALOG_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,

            run_migrations: parse_or(&lookup, "CATALOG_RUN_MIGRATIONS", defaults.run_migrations)?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "CATALOG_MAX_CONNECTIONS".to_string(),
            ));
        }

        if config.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("CATALOG_DB_PATH".to_string()));
        }

        Ok(config)
    }

    /// Overrides the database path (e.g. from a `--db` flag).
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Builds the pool configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .run_migrations(self.run_migrations)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout_secs, 30);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_overrides() {
        let config = CatalogConfig::from_lookup(lookup(&[
            ("CATALOG_DB_PATH", "/tmp/catalog.db"),
            ("CATALOG_MAX_CONNECTIONS", "8"),
            ("CATALOG_RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/catalog.db"));
        assert_eq!(config.max_connections, 8);
        assert!(!config.run_migrations);

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert!(!db.run_migrations);
    }

    #[test]
    fn test_invalid_values() {
        let err = CatalogConfig::from_lookup(lookup(&[("CATALOG_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "CATALOG_MAX_CONNECTIONS"));

        let err =
            CatalogConfig::from_lookup(lookup(&[("CATALOG_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = CatalogConfig::from_lookup(lookup(&[("CATALOG_DB_PATH", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }
}
