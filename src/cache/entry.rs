//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant, None = beyond the representable clock horizon
    pub expires_at: Option<Instant>,
    /// Estimated payload weight used for memory accounting
    pub size: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` after `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now` - Write instant the TTL is relative to
    /// * `ttl` - Relative lifetime of the entry
    /// * `size` - Estimated weight of the payload
    pub fn new(value: V, now: Instant, ttl: Duration, size: usize) -> Self {
        Self {
            value,
            expires_at: now.checked_add(ttl),
            size,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so an
    /// entry written with a zero TTL is expired at its own creation instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
