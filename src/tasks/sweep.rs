//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries so they
//! stop occupying capacity before they are next read.

use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheInstance;

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between runs.
/// Sweeping only removes entries a read would already treat as absent.
///
/// # Arguments
/// * `name` - Cache name used in log output
/// * `cache` - Handle to the cache to sweep
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task("session", caches.session.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<K, V>(
    name: &'static str,
    cache: CacheInstance<K, V>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            cache = name,
            "Starting expiry sweep task with interval of {:?}", interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!(cache = name, "Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!(cache = name, "Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    fn cache() -> CacheInstance<String, String> {
        CacheInstance::new(&CacheConfig::new(300_000, 100)).unwrap()
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let cache = cache();
        cache.set(
            "expire_soon".to_string(),
            "value".to_string(),
            Some(Duration::from_millis(50)),
        );

        let handle = spawn_sweep_task("test", cache.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(250)).await;

        // Removed without any read touching it
        assert_eq!(cache.len(), 0, "Expired entry should have been swept");
        assert_eq!(cache.stats().expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let cache = cache();
        cache.set(
            "long_lived".to_string(),
            "value".to_string(),
            Some(Duration::from_secs(3600)),
        );

        let handle = spawn_sweep_task("test", cache.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get("long_lived").as_deref(), Some("value"));
        assert_eq!(cache.stats().evictions, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let handle = spawn_sweep_task("test", cache(), Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
