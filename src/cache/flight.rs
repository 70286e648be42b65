//! In-Flight Computation Module
//!
//! Tracks producer calls that have started but not settled, so that
//! concurrent misses on the same key share one computation.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;

use futures::future::{BoxFuture, Shared};

/// A producer computation that any number of callers can await.
pub type Flight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

struct Marker {
    id: u64,
    /// Type-erased `Flight<V, E>`
    flight: Box<dyn Any + Send>,
}

// == In-Flight Table ==
/// Per-key markers for unresolved producer computations.
///
/// Each marker carries an id so a settling computation only clears its own
/// marker, never one registered after a `clear` or by another producer type.
pub struct InFlightTable<K> {
    markers: HashMap<K, Marker>,
    next_id: u64,
}

impl<K> Default for InFlightTable<K> {
    fn default() -> Self {
        Self {
            markers: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<K: Hash + Eq> InFlightTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the id for the next registered flight.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // == Join ==
    /// Returns a handle to the flight in progress for `key`.
    ///
    /// Returns None when no flight exists or when the flight in progress
    /// produces a different `Result<V, E>` type.
    pub fn join<V, E>(&self, key: &K) -> Option<Flight<V, E>>
    where
        V: Clone + 'static,
        E: Clone + 'static,
    {
        self.markers
            .get(key)?
            .flight
            .downcast_ref::<Flight<V, E>>()
            .cloned()
    }

    // == Register ==
    /// Records `flight` as the computation in progress for `key`, replacing
    /// any previous marker.
    pub fn register<V, E>(&mut self, key: K, id: u64, flight: Flight<V, E>)
    where
        V: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        self.markers.insert(
            key,
            Marker {
                id,
                flight: Box::new(flight),
            },
        );
    }

    // == Settle ==
    /// Removes the marker for `key` if it still belongs to flight `id`.
    ///
    /// Returns false if the marker was cleared or replaced meanwhile.
    pub fn settle(&mut self, key: &K, id: u64) -> bool {
        match self.markers.get(key) {
            Some(marker) if marker.id == id => {
                self.markers.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Forgets every marker. Flights already awaited keep running.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn ready_flight(value: u32) -> Flight<u32, String> {
        futures::future::ready(Ok(value)).boxed().shared()
    }

    #[tokio::test]
    async fn test_join_returns_registered_flight() {
        let mut table = InFlightTable::new();
        let id = table.next_id();
        table.register("key".to_string(), id, ready_flight(7));

        let flight = table.join::<u32, String>(&"key".to_string()).unwrap();
        assert_eq!(flight.await, Ok(7));
    }

    #[test]
    fn test_join_with_other_types_misses() {
        let mut table = InFlightTable::new();
        let id = table.next_id();
        table.register("key".to_string(), id, ready_flight(7));

        assert!(table.join::<u32, ()>(&"key".to_string()).is_none());
        assert!(table.join::<u32, String>(&"other".to_string()).is_none());
    }

    #[test]
    fn test_settle_only_own_marker() {
        let mut table = InFlightTable::new();
        let first = table.next_id();
        let second = table.next_id();
        assert_ne!(first, second);

        table.register("key".to_string(), second, ready_flight(1));

        assert!(!table.settle(&"key".to_string(), first));
        assert_eq!(table.len(), 1);
        assert!(table.settle(&"key".to_string(), second));
        assert!(table.is_empty());
    }

    #[test]
    fn test_clear_forgets_markers() {
        let mut table = InFlightTable::new();
        let id = table.next_id();
        table.register("key".to_string(), id, ready_flight(1));

        table.clear();

        assert!(table.is_empty());
        assert!(!table.settle(&"key".to_string(), id));
    }
}
