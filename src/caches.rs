//! Named Caches Module
//!
//! The application-wide cache instances, constructed once from configuration
//! and handed to whichever component needs them.

use serde_json::Value;

use crate::cache::CacheInstance;
use crate::config::Config;
use crate::error::Result;

/// Cache of opaque JSON payloads keyed by string.
pub type JsonCache = CacheInstance<String, Value>;

pub const GLOBAL: &str = "global";
pub const SESSION: &str = "session";
pub const PERMISSION: &str = "permission";

/// Estimates an entry as its key length plus its serialized JSON length.
pub fn json_weigher(key: &String, value: &Value) -> usize {
    key.len() + serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
}

// == Named Caches ==
/// The "global", "session" and "permission" caches.
///
/// Cloning shares the underlying caches.
#[derive(Debug, Clone)]
pub struct NamedCaches {
    pub global: JsonCache,
    pub session: JsonCache,
    pub permission: JsonCache,
}

impl NamedCaches {
    /// Builds every cache, failing on the first invalid cache configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            global: JsonCache::with_weigher(&config.global, json_weigher)?,
            session: JsonCache::with_weigher(&config.session, json_weigher)?,
            permission: JsonCache::with_weigher(&config.permission, json_weigher)?,
        })
    }

    /// Looks a cache up by name.
    pub fn get(&self, name: &str) -> Option<&JsonCache> {
        match name {
            GLOBAL => Some(&self.global),
            SESSION => Some(&self.session),
            PERMISSION => Some(&self.permission),
            _ => None,
        }
    }

    /// Iterates `(name, cache)` pairs in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &JsonCache)> {
        [
            (GLOBAL, &self.global),
            (SESSION, &self.session),
            (PERMISSION, &self.permission),
        ]
        .into_iter()
    }
}
