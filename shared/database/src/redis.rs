//! Redis connection for the shared cache backend.

use anyhow::{ensure, Context, Result};
use redis::{aio::ConnectionManager, Client};

/// Multiplexed, auto-reconnecting connection; clones share one socket.
pub type RedisConnection = ConnectionManager;

pub async fn connect(redis_url: &str) -> Result<RedisConnection> {
    let client = Client::open(redis_url).context("Invalid Redis URL")?;
    let connection = ConnectionManager::new(client)
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", redis_url))?;

    tracing::info!("Connected to Redis cache");
    Ok(connection)
}

/// Fails unless the server answers PING with PONG.
pub async fn ping(connection: &mut RedisConnection) -> Result<()> {
    let reply: String = redis::cmd("PING")
        .query_async(connection)
        .await
        .context("Redis PING failed")?;
    ensure!(reply == "PONG", "Unexpected PING reply from Redis: {}", reply);
    Ok(())
}
