//! Cache Statistics Module
//!
//! Tracks cache occupancy and performance metrics.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache occupancy and counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Approximate weight of the stored payloads
    pub memory_usage: usize,
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries dropped because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates an empty snapshot for a cache of the given capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    /// Resets the counters, keeping the configured capacity.
    pub fn reset(&mut self) {
        *self = Self::new(self.max_size);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new(3);
        assert_eq!(stats.size, 0);
        assert_eq!(stats.max_size, 3);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new(10);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new(10);
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_eviction_and_expiration() {
        let mut stats = CacheStats::new(10);
        stats.record_eviction();
        stats.record_eviction();
        stats.record_expirations(3);
        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.expirations, 3);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut stats = CacheStats::new(7);
        stats.record_hit();
        stats.size = 4;

        stats.reset();

        assert_eq!(stats, CacheStats::new(7));
    }
}
