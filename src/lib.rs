//! Memo Cache - A bounded in-process cache engine
//!
//! Provides TTL expiration, LRU eviction and single-flight memoization of
//! expensive asynchronous lookups.

pub mod api;
pub mod cache;
pub mod caches;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheInstance, CacheStats};
pub use caches::NamedCaches;
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
