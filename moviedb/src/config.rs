//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite::memory:` |
//! | `BIND_ADDR` | `0.0.0.0:3000` |
//! | `DATABASE_MAX_CONNECTIONS` | `5` (always `1` for in-memory SQLite) |
//! | `SQLX_LOGGING` | `false` |
//! | `SEED_DEMO_DATA` | `false` |

use sea_orm::ConnectOptions;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub sqlx_logging: bool,
    pub seed_demo_data: bool,
}

/// A variable was present but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value '{}' for {}", self.value, self.variable)
    }
}

impl std::error::Error for ConfigError {}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            sqlx_logging: false,
            seed_demo_data: false,
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first variable that fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first variable that fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError {
            variable: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError {
                    variable: "DATABASE_MAX_CONNECTIONS",
                    value: raw,
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            sqlx_logging: parse_flag(&lookup, "SQLX_LOGGING")?,
            seed_demo_data: parse_flag(&lookup, "SEED_DEMO_DATA")?,
        })
    }

    /// In-memory SQLite lives inside a single connection, so the pool is pinned to one.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.database_url.starts_with("sqlite::memory:") || self.database_url.contains("mode=memory")
    }

    /// Connection options for `sea_orm::Database::connect`.
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.database_url.clone());
        let connections = if self.is_in_memory() { 1 } else { self.max_connections };
        opt.max_connections(connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(30))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(self.sqlx_logging);
        if self.is_in_memory() {
            // the database disappears with its last connection
            opt.idle_timeout(Duration::from_secs(u64::from(u32::MAX)))
                .max_lifetime(Duration::from_secs(u64::from(u32::MAX)));
        }
        opt
    }
}

fn parse_flag<F>(lookup: &F, variable: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        None => Ok(false),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError {
                variable,
                value: raw,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_values_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/movies"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("SQLX_LOGGING", "true"),
            ("SEED_DEMO_DATA", "1"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/movies");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_connections, 12);
        assert!(config.sqlx_logging);
        assert!(config.seed_demo_data);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("BIND_ADDR", "not-an-address")])).unwrap_err();
        assert_eq!(err.variable, "BIND_ADDR");

        let err =
            Config::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert_eq!(err.variable, "DATABASE_MAX_CONNECTIONS");

        let err = Config::from_lookup(lookup_from(&[("SEED_DEMO_DATA", "maybe")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value 'maybe' for SEED_DEMO_DATA");
    }
}
