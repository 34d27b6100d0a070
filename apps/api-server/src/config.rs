//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use quill_core::query::DEFAULT_MAX_LIMIT;
use quill_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Upper bound for the `limit` query parameter.
    pub max_page_size: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = lookup("DATABASE_URL")
            .or_else(|| lookup("MONGO_URI"))
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let mut config = DatabaseConfig::new(url);
                if let Some(name) = lookup("DATABASE_NAME").filter(|n| !n.is_empty()) {
                    config.database_name = name;
                }
                if let Some(max) = parsed(&lookup, "DB_MAX_CONNECTIONS") {
                    config.max_connections = max;
                }
                if let Some(min) = parsed(&lookup, "DB_MIN_CONNECTIONS") {
                    config.min_connections = min;
                }
                if let Some(secs) = parsed(&lookup, "DB_CONNECT_TIMEOUT_SECS") {
                    config.connect_timeout = Duration::from_secs(secs);
                }
                config
            });

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&lookup, "PORT").unwrap_or(8080),
            database,
            max_page_size: parsed(&lookup, "MAX_PAGE_SIZE")
                .filter(|max: &u64| *max > 0)
                .unwrap_or(DEFAULT_MAX_LIMIT),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|raw| raw.trim().parse().ok())
}
