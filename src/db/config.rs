//! Database connection settings.

use std::env;
use std::time::Duration;

const DEFAULT_URL: &str = "sqlite://inventory.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for opening the relational store.
///
/// Precedence is builder (CLI flag) > environment > default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLx connection URL, e.g. `sqlite://inventory.db`.
    pub url: String,
    /// Upper bound of pooled connections.
    pub max_connections: u32,
    /// Deadline applied to every repository call.
    pub statement_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }
}

impl DatabaseConfig {
    /// Build a config from `INVENTORY_DATABASE_URL`,
    /// `INVENTORY_DB_MAX_CONNECTIONS` and `INVENTORY_DB_STATEMENT_TIMEOUT_MS`.
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn new() -> Self {
        let defaults = Self::default();

        let url = env::var("INVENTORY_DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.url);

        let max_connections = env::var("INVENTORY_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_connections);

        let statement_timeout = env::var("INVENTORY_DB_STATEMENT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.statement_timeout);

        Self {
            url,
            max_connections,
            statement_timeout,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }
}
