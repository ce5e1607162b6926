//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Response cache TTL used by the listing endpoint (15 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 900;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// SQLite database file, or `:memory:`
    pub database_path: String,
    /// Redis connection URL; the in-process cache is used when unset
    pub redis_url: Option<String>,
    /// TTL in seconds for cached responses
    pub cache_ttl: u64,
    /// Prefix for every response cache key
    pub cache_key_prefix: String,
    /// Capacity of the in-process cache
    pub cache_max_entries: usize,
    /// Expiry sweep interval of the in-process cache, in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `DATABASE_PATH` - SQLite file (default: properties.db)
    /// - `REDIS_URL` - Redis URL (default: unset, in-process cache)
    /// - `CACHE_TTL` - Response cache TTL in seconds (default: 900)
    /// - `CACHE_KEY_PREFIX` - Cache key namespace (default: property_cache)
    /// - `CACHE_MAX_ENTRIES` - In-process cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - In-process expiry sweep in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            cache_ttl: parsed_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_key_prefix: env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.cache_key_prefix),
            cache_max_entries: parsed_var("CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cleanup_interval: parsed_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Response cache TTL as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            database_path: "properties.db".to_string(),
            redis_url: None,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            cache_key_prefix: "property_cache".to_string(),
            cache_max_entries: 10_000,
            cleanup_interval: 60,
        }
    }
}
