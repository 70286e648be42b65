//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Statistics of one named cache (GET /stats/:name)
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Cache name
    pub name: String,
    /// Current number of entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Approximate payload weight
    pub memory_usage: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    /// Creates a response from a statistics snapshot
    pub fn new(name: impl Into<String>, stats: &CacheStats) -> Self {
        Self {
            name: name.into(),
            size: stats.size,
            max_size: stats.max_size,
            memory_usage: stats.memory_usage,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Statistics of every named cache (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsOverviewResponse {
    pub caches: Vec<CacheStatsResponse>,
}

/// Response body for POST /caches/:name/clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// The cache that was cleared
    pub cache: String,
}

impl ClearResponse {
    pub fn new(cache: impl Into<String>) -> Self {
        let cache = cache.into();
        Self {
            message: format!("Cache '{}' cleared successfully", cache),
            cache,
        }
    }
}

/// Response body for POST /caches/:name/purge
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// The cache that was swept
    pub cache: String,
    /// Number of expired entries removed
    pub removed: usize,
}

impl PurgeResponse {
    pub fn new(cache: impl Into<String>, removed: usize) -> Self {
        Self {
            cache: cache.into(),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
