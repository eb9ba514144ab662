//! Configuration Module
//!
//! Loads cache, retry and server settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL applied when a caller does not give one
    pub default_ttl: Duration,
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Interval between janitor sweeps
    pub cleanup_interval: Duration,
    /// Total attempts made by the resilient fetcher
    pub max_attempts: u32,
    /// Base delay for linear retry backoff
    pub base_delay: Duration,
    /// HTTP inspection server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Janitor sweep interval (default: 60000)
    /// - `FETCH_MAX_ATTEMPTS` - Attempts per fetch (default: 3)
    /// - `FETCH_BASE_DELAY_MS` - Backoff base delay (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env_millis("CACHE_TTL_MS").unwrap_or(defaults.default_ttl),
            max_size: env_parse("CACHE_MAX_SIZE").unwrap_or(defaults.max_size),
            cleanup_interval: env_millis("CACHE_CLEANUP_INTERVAL_MS")
                .unwrap_or(defaults.cleanup_interval),
            max_attempts: env_parse("FETCH_MAX_ATTEMPTS").unwrap_or(defaults.max_attempts),
            base_delay: env_millis("FETCH_BASE_DELAY_MS").unwrap_or(defaults.base_delay),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_millis(300_000),
            max_size: 1000,
            cleanup_interval: Duration::from_millis(60_000),
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            server_port: 3000,
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_millis(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_millis)
}
