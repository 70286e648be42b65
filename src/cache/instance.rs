//! Cache Instance Module
//!
//! Thread-safe, shareable cache handle with single-flight miss coalescing.

use std::borrow::Borrow;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::panic;
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use tracing::debug;

use crate::cache::flight::{Flight, InFlightTable};
use crate::cache::store::{default_weigher, EntryStore, Weigher};
use crate::cache::CacheStats;
use crate::config::CacheConfig;
use crate::error::Result;

struct State<K, V> {
    store: EntryStore<K, V>,
    flights: InFlightTable<K>,
}

// == Cache Instance ==
/// A bounded cache with TTL expiration, LRU eviction and memoized misses.
///
/// Cloning yields another handle to the same cache. Every operation runs
/// as one short critical section; the producers started by
/// [`get_or_set`](Self::get_or_set) run on their own tasks, outside the lock.
pub struct CacheInstance<K, V> {
    state: Arc<Mutex<State<K, V>>>,
}

impl<K, V> Clone for CacheInstance<K, V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<K, V> fmt::Debug for CacheInstance<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CacheInstance")
            .field("size", &state.store.len())
            .field("max_size", &state.store.max_size())
            .field("in_flight", &state.flights.len())
            .finish()
    }
}

impl<K, V> CacheInstance<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// Fails with `CacheError::InvalidConfig` if the TTL or capacity is zero.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Self::with_weigher(config, default_weigher::<K, V>)
    }

    /// Creates an empty cache that estimates `memory_usage` with `weigher`.
    pub fn with_weigher(config: &CacheConfig, weigher: Weigher<K, V>) -> Result<Self> {
        config.validate()?;

        let store = EntryStore::new(config.max_size, config.ttl(), weigher);
        Ok(Self {
            state: Arc::new(Mutex::new(State {
                store,
                flights: InFlightTable::new(),
            })),
        })
    }

    // == Get ==
    /// Returns the live value for `key`, promoting it to most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().store.get(key)
    }

    // == Set ==
    /// Inserts or overwrites `key`, expiring after `ttl` or the default TTL.
    pub fn set(&self, key: K, value: V, ttl: Option<Duration>) {
        self.state.lock().store.set(key, value, ttl);
    }

    // == Delete ==
    /// Removes `key`. Returns false if there was nothing to remove.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().store.delete(key)
    }

    // == Clear ==
    /// Empties the cache and forgets in-flight computations.
    ///
    /// Callers already awaiting a forgotten computation still receive its
    /// result, but the result is not stored.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let forgotten = state.flights.len();
        state.store.clear();
        state.flights.clear();
        debug!(forgotten, "cache cleared");
    }

    // == Stats ==
    /// Returns a statistics snapshot without touching recency order.
    pub fn stats(&self) -> CacheStats {
        self.state.lock().store.stats()
    }

    /// Removes every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.state.lock().store.purge_expired()
    }

    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().store.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.state.lock().store.max_size()
    }

    pub fn default_ttl(&self) -> Duration {
        self.state.lock().store.default_ttl()
    }

    /// Number of producer computations currently in flight.
    pub fn in_flight(&self) -> usize {
        self.state.lock().flights.len()
    }
}

impl<K, V> CacheInstance<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Get Or Set ==
    /// Returns the cached value for `key`, or computes it with `producer`.
    ///
    /// On a miss, concurrent callers for the same key share a single producer
    /// invocation. A successful result is stored with `ttl` (or the default
    /// TTL) and handed to every waiting caller. A failure is handed to every
    /// waiting caller and nothing is stored, so the next call runs the
    /// producer again.
    ///
    /// The producer runs on its own Tokio task and always settles, even if
    /// every caller stops waiting. A producer that panics settles as well,
    /// and the panic is resumed in the callers awaiting it.
    ///
    /// Coalescing is keyed on `key` together with the `Result<V, E>` type.
    /// A caller whose `E` differs from the flight in progress cannot join it:
    /// its producer replaces the marker, so two producers run for that miss
    /// and only the replacing one's success is stored.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: K,
        producer: F,
        ttl: Option<Duration>,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
        E: Clone + Send + Sync + 'static,
    {
        let flight = {
            let mut state = self.state.lock();
            if let Some(value) = state.store.get(&key) {
                return Ok(value);
            }

            match state.flights.join::<V, E>(&key) {
                Some(flight) => flight,
                None => {
                    let id = state.flights.next_id();
                    let flight = self.launch(key.clone(), id, producer, ttl);
                    state.flights.register(key, id, flight.clone());
                    debug!(flight = id, "launched producer for cache miss");
                    flight
                }
            }
        };

        flight.await
    }

    /// Spawns `producer` onto its own task, which settles the marker and
    /// stores a successful result whether or not anyone is still waiting.
    fn launch<F, Fut, E>(
        &self,
        key: K,
        id: u64,
        producer: F,
        ttl: Option<Duration>,
    ) -> Flight<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
        E: Clone + Send + Sync + 'static,
    {
        let guard = SettleGuard {
            state: Arc::downgrade(&self.state),
            key: Some(key),
            id,
        };

        let task = tokio::spawn(async move {
            let result = producer().await;
            guard.complete(result.as_ref().ok().cloned(), ttl);
            result
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(err) => match err.try_into_panic() {
                    Ok(payload) => panic::resume_unwind(payload),
                    Err(err) => panic!("producer task stopped before settling: {err}"),
                },
            }
        }
        .boxed()
        .shared()
    }
}

// == Settle Guard ==
/// Owns a flight's marker for the lifetime of its producer task.
///
/// Dropping the guard without [`complete`](Self::complete), when the producer
/// panics or its task is cancelled, still settles the marker.
struct SettleGuard<K: Hash + Eq, V> {
    state: Weak<Mutex<State<K, V>>>,
    key: Option<K>,
    id: u64,
}

impl<K: Hash + Eq + Clone, V> SettleGuard<K, V> {
    /// Settles the marker, storing `value` if the marker is still this flight's.
    fn complete(mut self, value: Option<V>, ttl: Option<Duration>) {
        let (Some(key), Some(shared)) = (self.key.take(), self.state.upgrade()) else {
            return;
        };

        let mut state = shared.lock();
        if !state.flights.settle(&key, self.id) {
            debug!(flight = self.id, "in-flight marker was cleared, result not stored");
            return;
        }
        if let Some(value) = value {
            state.store.set(key, value, ttl);
        }
    }
}

impl<K: Hash + Eq, V> Drop for SettleGuard<K, V> {
    fn drop(&mut self) {
        let (Some(key), Some(shared)) = (self.key.take(), self.state.upgrade()) else {
            return;
        };

        if shared.lock().flights.settle(&key, self.id) {
            debug!(flight = self.id, "producer did not finish, marker settled");
        }
    }
}
