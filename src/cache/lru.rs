//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a monotonically increasing tick:
/// - Lowest tick = Least recently used
/// - Highest tick = Most recently used
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Current tick of each tracked key
    ticks: HashMap<K, u64>,
    /// Keys ordered by tick
    order: BTreeMap<u64, K>,
    /// Next tick to hand out
    next_tick: u64,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self {
            ticks: HashMap::new(),
            order: BTreeMap::new(),
            next_tick: 0,
        }
    }
}

impl<K: Hash + Eq + Clone> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// An already tracked key is re-stamped, a new key is added.
    pub fn touch(&mut self, key: &K) {
        if self.promote(key) {
            return;
        }

        let tick = self.next_tick;
        self.next_tick += 1;
        self.ticks.insert(key.clone(), tick);
        self.order.insert(tick, key.clone());
    }

    // == Promote ==
    /// Marks an already tracked key as most recently used.
    ///
    /// Returns false, and tracks nothing, if the key is unknown.
    pub fn promote<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(tick) = self.ticks.get_mut(key) else {
            return false;
        };

        let next = self.next_tick;
        self.next_tick += 1;
        if let Some(owned) = self.order.remove(&*tick) {
            self.order.insert(next, owned);
        }
        *tick = next;
        true
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns true if it was tracked.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.ticks.remove(key) {
            Some(tick) => {
                self.order.remove(&tick);
                true
            }
            None => false,
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.values()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.ticks.clear();
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn order(lru: &LruTracker<String>) -> Vec<&str> {
        lru.iter().map(String::as_str).collect()
    }

    fn tracker(keys: &[&str]) -> LruTracker<String> {
        let mut lru = LruTracker::new();
        for key in keys {
            lru.touch(&key.to_string());
        }
        lru
    }

    #[test]
    fn test_lru_new() {
        let lru: LruTracker<String> = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.iter().next(), None);
    }

    #[test]
    fn test_lru_touch_new_key() {
        let lru = tracker(&["key1", "key2", "key3"]);

        assert_eq!(lru.len(), 3);
        // key1 is oldest (added first)
        assert_eq!(order(&lru), vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_lru_touch_existing_key() {
        let mut lru = tracker(&["key1", "key2", "key3"]);

        lru.touch(&"key1".to_string());

        assert_eq!(lru.len(), 3);
        assert_eq!(order(&lru), vec!["key2", "key3", "key1"]);
    }

    #[test]
    fn test_lru_evict_oldest() {
        let mut lru = tracker(&["key1", "key2", "key3"]);

        assert_eq!(lru.evict_oldest().as_deref(), Some("key1"));
        assert_eq!(lru.len(), 2);
        assert_eq!(order(&lru), vec!["key2", "key3"]);

        assert_eq!(lru.evict_oldest().as_deref(), Some("key2"));
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_evict_empty() {
        let mut lru: LruTracker<String> = LruTracker::new();
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = tracker(&["key1", "key2", "key3"]);

        assert!(lru.remove("key2"));

        assert_eq!(lru.len(), 2);
        assert_eq!(order(&lru), vec!["key1", "key3"]);
    }

    #[test]
    fn test_lru_remove_nonexistent_key() {
        let mut lru = tracker(&["key1", "key2"]);

        assert!(!lru.remove("nonexistent"));

        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        // a, b, c then a, c, b => oldest to newest: a, c, b
        let mut lru = tracker(&["a", "b", "c", "a", "c", "b"]);

        assert_eq!(order(&lru), vec!["a", "c", "b"]);

        assert_eq!(lru.evict_oldest().as_deref(), Some("a"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("c"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("b"));
    }

    #[test]
    fn test_lru_touch_same_key_multiple_times() {
        let mut lru = tracker(&["key1", "key1", "key1"]);

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest().as_deref(), Some("key1"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_promote() {
        let mut lru = tracker(&["a", "b", "c"]);

        assert!(lru.promote("a"));
        assert!(!lru.promote("missing"));

        assert_eq!(order(&lru), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = tracker(&["a", "b"]);

        lru.clear();

        assert!(lru.is_empty());
        assert_eq!(lru.evict_oldest(), None);
    }
}
