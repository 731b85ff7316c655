//! # Lumber Estimator Persistence
//!
//! Key-value storage behind the extraction result cache: an in-memory LRU
//! store for single-process use and a Redis store shared across instances.

pub mod redis;
pub mod store;

pub use self::redis::{connect as connect_redis, ping as ping_redis, RedisConnection};
pub use store::{KeyValueStore, MemoryStore, RedisStore};

use anyhow::Result;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub redis_url: Option<String>,
    pub key_prefix: String,
    pub max_entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "lumber:estimate:".to_string(),
            max_entries: 512,
        }
    }
}

/// Connect the configured store: Redis when a URL is given, memory otherwise.
pub async fn initialize_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    match &config.redis_url {
        Some(url) => {
            let mut connection = connect_redis(url).await?;
            ping_redis(&mut connection).await?;
            Ok(Arc::new(RedisStore::new(connection, config.key_prefix.clone())))
        }
        None => Ok(Arc::new(MemoryStore::new(config.max_entries))),
    }
}
