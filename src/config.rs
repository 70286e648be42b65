//! Configuration Module
//!
//! Cache construction options and process configuration loaded from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

// == Cache Config ==
/// Options for a single cache instance. Both are required and must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Default entry lifetime in milliseconds
    pub ttl_ms: u64,
    /// Maximum live entry count
    pub max_size: usize,
}

impl CacheConfig {
    pub fn new(ttl_ms: u64, max_size: usize) -> Self {
        Self { ttl_ms, max_size }
    }

    /// Rejects non-positive values instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        if self.ttl_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "ttl must be a positive number of milliseconds".to_string(),
            ));
        }
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Default entry lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    fn from_env(prefix: &str, defaults: CacheConfig) -> Self {
        Self {
            ttl_ms: env_or(&format!("{prefix}_CACHE_TTL_MS"), defaults.ttl_ms),
            max_size: env_or(&format!("{prefix}_CACHE_MAX_SIZE"), defaults.max_size),
        }
    }
}

/// Process configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application-wide cache
    pub global: CacheConfig,
    /// Per-session data cache
    pub session: CacheConfig,
    /// Permission lookup cache
    pub permission: CacheConfig,
    /// Background sweep interval in milliseconds, 0 disables sweeping
    pub sweep_interval_ms: u64,
    /// Diagnostics HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `GLOBAL_CACHE_TTL_MS` / `GLOBAL_CACHE_MAX_SIZE` (default: 300000 / 1000)
    /// - `SESSION_CACHE_TTL_MS` / `SESSION_CACHE_MAX_SIZE` (default: 1800000 / 500)
    /// - `PERMISSION_CACHE_TTL_MS` / `PERMISSION_CACHE_MAX_SIZE` (default: 600000 / 1000)
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency, 0 disables (default: 60000)
    /// - `SERVER_PORT` - Diagnostics port (default: 3000)
    ///
    /// Unparseable values fall back to their defaults. Out-of-range values are
    /// kept and rejected when the caches are built.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            global: CacheConfig::from_env("GLOBAL", defaults.global),
            session: CacheConfig::from_env("SESSION", defaults.session),
            permission: CacheConfig::from_env("PERMISSION", defaults.permission),
            sweep_interval_ms: env_or("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Sweep interval, or None when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_ms > 0).then(|| Duration::from_millis(self.sweep_interval_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: CacheConfig::new(300_000, 1000),
            session: CacheConfig::new(1_800_000, 500),
            permission: CacheConfig::new(600_000, 1000),
            sweep_interval_ms: 60_000,
            server_port: 3000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.global, CacheConfig::new(300_000, 1000));
        assert_eq!(config.session, CacheConfig::new(1_800_000, 500));
        assert_eq!(config.permission, CacheConfig::new(600_000, 1000));
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(60)));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("PERMISSION_CACHE_TTL_MS", "2500");
        env::set_var("PERMISSION_CACHE_MAX_SIZE", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.permission.ttl_ms, 2500);
        assert_eq!(config.permission.max_size, 1000);

        env::remove_var("PERMISSION_CACHE_TTL_MS");
        env::remove_var("PERMISSION_CACHE_MAX_SIZE");
    }

    #[test]
    fn test_sweep_disabled() {
        let config = Config {
            sweep_interval_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.sweep_interval(), None);
    }

    #[test]
    fn test_cache_config_validation() {
        assert!(CacheConfig::new(100, 3).validate().is_ok());
        assert!(matches!(
            CacheConfig::new(0, 3).validate(),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            CacheConfig::new(100, 0).validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_cache_config_ttl() {
        assert_eq!(CacheConfig::new(150, 1).ttl(), Duration::from_millis(150));
    }
}
