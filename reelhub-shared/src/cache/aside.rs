/// Read-through caching on top of the Redis client
///
/// Aggregation queries are expensive (joins and SUMs across the whole video
/// table), so their results are cached in Redis as JSON with a TTL. The cache
/// is read-through only: writes never invalidate, entries simply expire.
///
/// Redis being down or a payload failing to deserialize is never fatal. Both
/// are treated as a miss and the value is computed from Postgres.
///
/// Concurrent misses on the same key within one process are collapsed to a
/// single computation: the first caller computes while the rest wait on a
/// per-key lock, then read the freshly stored value.
///
/// # Example
///
/// ```no_run
/// use reelhub_shared::cache::aside::CacheAside;
/// use reelhub_shared::cache::client::{CacheClient, CacheConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = CacheClient::new(CacheConfig::from_env()?).await?;
/// let cache = CacheAside::new(client);
///
/// let names: Vec<String> = cache
///     .get_or_compute("expensive_query", 600, async {
///         Ok::<_, anyhow::Error>(vec!["computed".to_string()])
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```

use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::client::CacheClient;

/// Read-through cache over Redis with per-key request coalescing
#[derive(Clone)]
pub struct CacheAside {
    client: CacheClient,
    flights: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl CacheAside {
    pub fn new(client: CacheClient) -> Self {
        Self {
            client,
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The underlying Redis client
    pub fn client(&self) -> &CacheClient {
        &self.client
    }

    /// Fetches a cached value, computing and storing it on a miss.
    ///
    /// `compute` is a lazy future: it does no work unless the key misses, so
    /// passing a query future directly is free on a hit. The computation's
    /// error is returned as-is; cache failures are logged and degrade to a
    /// miss. The stored value expires after `ttl_secs`.
    pub async fn get_or_compute<T, E, Fut>(
        &self,
        key: &str,
        ttl_secs: u64,
        compute: Fut,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.lookup::<T>(key).await {
            return Ok(hit);
        }

        let gate = self.begin_flight(key).await;
        let guard = gate.lock().await;

        // Another caller may have stored the value while we waited for the lock.
        if let Some(hit) = self.lookup::<T>(key).await {
            drop(guard);
            drop(gate);
            self.end_flight(key).await;
            return Ok(hit);
        }

        tracing::debug!("Cache miss for '{}', computing", key);
        let result = compute.await;

        if let Ok(value) = &result {
            self.store(key, value, ttl_secs).await;
        }

        drop(guard);
        drop(gate);
        self.end_flight(key).await;

        result
    }

    /// Reads and deserializes a cached value. Any failure counts as a miss.
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.client.get_connection();

        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Cache read for '{}' failed, treating as miss: {}", key, e);
                return None;
            }
        };

        let raw = raw?;

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!("Cache hit for '{}'", key);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Cached payload for '{}' is corrupt, treating as miss: {}", key, e);
                None
            }
        }
    }

    /// Serializes and stores a value with a TTL. Failures are logged, not
    /// returned: the caller already holds the computed value.
    async fn store<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to serialize cache payload for '{}': {}", key, e);
                return;
            }
        };

        let mut conn = self.client.get_connection();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(key, payload, ttl_secs)
            .await
        {
            tracing::warn!("Cache write for '{}' failed: {}", key, e);
        }
    }

    /// Registers this caller's interest in `key`, returning the shared
    /// per-key lock.
    async fn begin_flight(&self, key: &str) -> Arc<Mutex<()>> {
        let mut flights = self.flights.lock().await;
        flights
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the per-key lock entry once the last interested caller is done.
    ///
    /// Callers must drop their clone of the lock before calling this, so the
    /// registry's reference is the only one left when nobody is waiting.
    async fn end_flight(&self, key: &str) {
        let mut flights = self.flights.lock().await;
        if let Some(gate) = flights.get(key) {
            if Arc::strong_count(gate) == 1 {
                flights.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::client::CacheConfig;

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_get_or_compute_round_trip() {
        let client = CacheClient::new(CacheConfig::default_for_test())
            .await
            .unwrap();
        let cache = CacheAside::new(client);

        let key = format!("test:aside:{}", uuid::Uuid::new_v4());

        // First call computes
        let first: Vec<i64> = cache
            .get_or_compute(&key, 60, async { Ok::<_, anyhow::Error>(vec![1, 2, 3]) })
            .await
            .unwrap();
        assert_eq!(first, vec![1, 2, 3]);

        // Second call must come from the cache, not the computation
        let second: Vec<i64> = cache
            .get_or_compute(&key, 60, async {
                Err::<Vec<i64>, _>(anyhow::anyhow!("value should have come from cache"))
            })
            .await
            .unwrap();
        assert_eq!(second, vec![1, 2, 3]);

        let mut conn = cache.client().get_connection();
        let _: () = conn.del(&key).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_compute_error_is_not_cached() {
        let client = CacheClient::new(CacheConfig::default_for_test())
            .await
            .unwrap();
        let cache = CacheAside::new(client);

        let key = format!("test:aside:{}", uuid::Uuid::new_v4());

        let failed: Result<Vec<i64>, anyhow::Error> = cache
            .get_or_compute(&key, 60, async { Err(anyhow::anyhow!("query failed")) })
            .await;
        assert!(failed.is_err());

        // The failure must not poison the key for later callers
        let recovered: Vec<i64> = cache
            .get_or_compute(&key, 60, async { Ok::<_, anyhow::Error>(vec![7]) })
            .await
            .unwrap();
        assert_eq!(recovered, vec![7]);

        let mut conn = cache.client().get_connection();
        let _: () = conn.del(&key).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_corrupt_payload_degrades_to_miss() {
        let client = CacheClient::new(CacheConfig::default_for_test())
            .await
            .unwrap();
        let cache = CacheAside::new(client);

        let key = format!("test:aside:{}", uuid::Uuid::new_v4());

        // Seed the key with something that is not valid JSON for Vec<i64>
        let mut conn = cache.client().get_connection();
        let _: () = conn.set(&key, "not json at all").await.unwrap();

        let value: Vec<i64> = cache
            .get_or_compute(&key, 60, async { Ok::<_, anyhow::Error>(vec![42]) })
            .await
            .unwrap();
        assert_eq!(value, vec![42]);

        let _: () = conn.del(&key).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_concurrent_misses_compute_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let client = CacheClient::new(CacheConfig::default_for_test())
            .await
            .unwrap();
        let cache = CacheAside::new(client);

        let key = format!("test:aside:{}", uuid::Uuid::new_v4());
        let computations = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let key = key.clone();
            let computations = Arc::clone(&computations);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute(&key, 60, async {
                        computations.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                        Ok::<_, anyhow::Error>(vec![99])
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), vec![99]);
        }
        assert_eq!(computations.load(Ordering::SeqCst), 1);

        let mut conn = cache.client().get_connection();
        let _: () = conn.del(&key).await.unwrap();
    }
}
