//! Cache Module
//!
//! Provides bounded in-memory caching with TTL expiration, LRU eviction and
//! single-flight computation of misses.

mod entry;
mod flight;
mod instance;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use flight::{Flight, InFlightTable};
pub use instance::CacheInstance;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{default_weigher, EntryStore, Weigher};
