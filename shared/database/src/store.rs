//! Key-Value Store
//!
//! The persistence boundary used by the estimate cache: get, put with a TTL,
//! delete. Values are opaque serialized strings.

use anyhow::{Context, Result};
use async_trait::async_trait;
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use moka::Expiry;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::redis::RedisConnection;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove every entry owned by this store, returning how many were removed.
    async fn clear(&self) -> Result<usize>;

    fn backend_name(&self) -> &'static str;
}

/// Stored value with the TTL it was written under.
#[derive(Clone)]
struct StoredValue {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL given to its own `put`.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &StoredValue, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process store with per-entry expiry and least-recently-used eviction.
pub struct MemoryStore {
    cache: Cache<String, StoredValue>,
}

impl MemoryStore {
    pub fn new(max_entries: usize) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries.max(1) as u64)
            .eviction_policy(EvictionPolicy::lru())
            .expire_after(PerEntryTtl)
            .eviction_listener(|key: Arc<String>, _value, cause| {
                if matches!(cause, RemovalCause::Size) {
                    tracing::debug!(key = %key, "Evicted least recently used entry");
                }
            })
            .build();
        Self { cache }
    }

    /// Live entries, after pending evictions and expirations are applied.
    pub fn len(&self) -> usize {
        self.cache.run_pending_tasks();
        self.cache.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(512)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).map(|stored| stored.value))
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.cache.insert(key.to_string(), StoredValue { value, ttl });
        // Apply eviction now so the capacity bound holds after every write.
        self.cache.run_pending_tasks();
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key);
        Ok(())
    }

    async fn clear(&self) -> Result<usize> {
        let removed = self.cache.iter().count();
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Redis-backed store; keys are namespaced under `prefix` and expire via `SET EX`.
#[derive(Clone)]
pub struct RedisStore {
    connection: RedisConnection,
    prefix: String,
}

impl RedisStore {
    pub fn new(connection: RedisConnection, prefix: impl Into<String>) -> Self {
        Self {
            connection,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut con = self.connection.clone();
        let value: Option<String> = con
            .get(self.key(key))
            .await
            .context("Failed to read cache entry from Redis")?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut con = self.connection.clone();
        let _: () = redis::cmd("SET")
            .arg(self.key(key))
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut con)
            .await
            .context("Failed to write cache entry to Redis")?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut con = self.connection.clone();
        let _: () = con
            .del(self.key(key))
            .await
            .context("Failed to delete cache entry from Redis")?;
        Ok(())
    }

    async fn clear(&self) -> Result<usize> {
        let mut con = self.connection.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(format!("{}*", self.prefix))
            .query_async(&mut con)
            .await
            .context("Failed to list cache keys in Redis")?;

        if keys.is_empty() {
            return Ok(0);
        }

        let removed: usize = con
            .del(&keys)
            .await
            .context("Failed to clear cache entries in Redis")?;
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new(4);
        store.put("a", "1".to_string(), HOUR).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.delete("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_expires_entries() {
        let store = MemoryStore::new(4);
        store.put("a", "1".to_string(), Duration::ZERO).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_expiry_is_per_entry() {
        let store = MemoryStore::new(4);
        store.put("short", "1".to_string(), Duration::from_millis(20)).await.unwrap();
        store.put("long", "2".to_string(), HOUR).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("long").await.unwrap(), Some("2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_evicts_least_recently_used() {
        let store = MemoryStore::new(2);
        store.put("a", "1".to_string(), HOUR).await.unwrap();
        store.put("b", "2".to_string(), HOUR).await.unwrap();

        // Touch "a" so "b" becomes the eviction candidate.
        store.get("a").await.unwrap();
        store.put("c", "3".to_string(), HOUR).await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.get("a").await.unwrap().is_some());
        assert!(store.get("b").await.unwrap().is_none());
        assert!(store.get("c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_memory_store_clear() {
        let store = MemoryStore::default();
        store.put("a", "1".to_string(), HOUR).await.unwrap();
        store.put("b", "2".to_string(), HOUR).await.unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.is_empty());
        assert_eq!(store.backend_name(), "memory");
    }

    proptest! {
        /// The store never holds more than its capacity.
        #[test]
        fn prop_memory_store_respects_capacity(
            capacity in 1usize..8,
            keys in prop::collection::vec("[a-f]{1,3}", 1..40),
        ) {
            let store = MemoryStore::new(capacity);
            tokio_test::block_on(async {
                for key in &keys {
                    store.put(key, key.clone(), HOUR).await.unwrap();
                }
            });
            prop_assert!(store.len() <= capacity);
            let last = keys.last().unwrap();
            let value = tokio_test::block_on(store.get(last)).unwrap();
            prop_assert_eq!(value, Some(last.clone()));
        }
    }
}
