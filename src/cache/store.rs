//! Entry Store Module
//!
//! Single-threaded cache core combining HashMap storage with LRU tracking,
//! lazy TTL expiration and capacity enforcement.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

/// Estimates the weight of a stored payload for memory accounting.
pub type Weigher<K, V> = fn(&K, &V) -> usize;

/// Weighs an entry by the inline size of its key and value types.
pub fn default_weigher<K, V>(_key: &K, _value: &V) -> usize {
    std::mem::size_of::<K>() + std::mem::size_of::<V>()
}

// == Entry Store ==
/// Cache storage with LRU eviction and TTL support.
///
/// Not synchronized; `CacheInstance` wraps it in a lock.
pub struct EntryStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Hit/miss/eviction counters
    stats: CacheStats,
    /// Sum of the weights of all stored entries
    memory_usage: usize,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL for entries written without an explicit TTL
    default_ttl: Duration,
    weigher: Weigher<K, V>,
}

impl<K: Hash + Eq + Clone, V> EntryStore<K, V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries the store can hold
    /// * `default_ttl` - TTL for entries written without an explicit TTL
    /// * `weigher` - Payload size estimator
    pub fn new(max_size: usize, default_ttl: Duration, weigher: Weigher<K, V>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(max_size),
            memory_usage: 0,
            max_size,
            default_ttl,
            weigher,
        }
    }

    // == Set ==
    /// Stores a key-value pair, expiring `ttl` (or the default TTL) from now.
    ///
    /// An existing entry is replaced in place and the key becomes most
    /// recently used. If the store then holds more than `max_size` entries,
    /// least recently used entries are evicted until it fits again. A zero
    /// TTL expires immediately: any previous entry is dropped and nothing is
    /// stored.
    pub fn set(&mut self, key: K, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl.is_zero() {
            self.remove_entry(&key);
            return;
        }

        let size = (self.weigher)(&key, &value);
        let entry = CacheEntry::new(value, Instant::now(), ttl, size);

        self.lru.touch(&key);
        if let Some(previous) = self.entries.insert(key, entry) {
            self.memory_usage = self.memory_usage.saturating_sub(previous.size);
        }
        self.memory_usage += size;

        self.enforce_capacity();
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit promotes the key to most recently used. An expired entry is
    /// removed and reported as a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(Instant::now()),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            trace!(size = self.entries.len(), "lazily expired entry on read");
            return None;
        }

        let value = self.entries.get(key).map(|entry| entry.value.clone());
        self.lru.promote(key);
        self.stats.record_hit();
        value
    }

    // == Delete ==
    /// Removes an entry by key. Returns true if an entry was removed.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.reset();
        self.memory_usage = 0;
    }

    // == Stats ==
    /// Returns current cache statistics without touching recency.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            memory_usage: self.memory_usage,
            ..self.stats.clone()
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Length ==
    /// Returns the current number of stored entries, including expired ones
    /// that have not been discovered yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Iterates stored keys from least to most recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.lru.iter()
    }

    fn remove_entry<Q>(&mut self, key: &Q) -> Option<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.memory_usage = self.memory_usage.saturating_sub(entry.size);
        Some(entry)
    }

    fn enforce_capacity(&mut self) {
        let now = Instant::now();

        while self.entries.len() > self.max_size {
            let Some(victim) = self.lru.evict_oldest() else {
                break;
            };
            let Some(entry) = self.entries.remove(&victim) else {
                continue;
            };

            self.memory_usage = self.memory_usage.saturating_sub(entry.size);
            if entry.is_expired_at(now) {
                self.stats.record_expirations(1);
            } else {
                self.stats.record_eviction();
                trace!(max_size = self.max_size, "evicted least recently used entry");
            }
        }
    }
}
