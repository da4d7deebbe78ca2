//! Redis-backed store implementation.
//!
//! The membership-filter primitives map to the `BF.*` command family and
//! require a server with the RedisBloom module loaded (e.g. redis-stack).

use super::kv::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::info;

/// Redis implementation of [`KeyValueStore`].
///
/// Uses connection pooling via `ConnectionManager` for efficient connection
/// reuse across concurrent request handlers.
pub struct RedisKeyValueStore {
    client: ConnectionManager,
}

impl RedisKeyValueStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { client: manager })
    }
}

fn map_redis_error(e: redis::RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Operation(e.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.client.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(map_redis_error)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(map_redis_error)
    }

    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> StoreResult<bool> {
        let mut conn = self.client.clone();
        // SET NX PX: create only if absent, millisecond expiry. Replies OK
        // on success and nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.client.clone();
        conn.del::<_, i64>(key)
            .await
            .map(|_| ())
            .map_err(map_redis_error)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.client.clone();
        conn.exists::<_, bool>(key).await.map_err(map_redis_error)
    }

    async fn filter_reserve(&self, key: &str, error_rate: f64, capacity: u64) -> StoreResult<()> {
        let mut conn = self.client.clone();
        redis::cmd("BF.RESERVE")
            .arg(key)
            .arg(error_rate)
            .arg(capacity)
            .query_async::<()>(&mut conn)
            .await
            .map_err(map_redis_error)
    }

    async fn filter_add(&self, key: &str, item: &str) -> StoreResult<bool> {
        let mut conn = self.client.clone();
        let added: i64 = redis::cmd("BF.ADD")
            .arg(key)
            .arg(item)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(added == 1)
    }

    async fn filter_add_many(&self, key: &str, items: &[String]) -> StoreResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        let mut conn = self.client.clone();
        let mut pipe = redis::pipe();
        for item in items {
            pipe.cmd("BF.ADD").arg(key).arg(item).ignore();
        }
        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(map_redis_error)
    }

    async fn filter_contains(&self, key: &str, item: &str) -> StoreResult<bool> {
        let mut conn = self.client.clone();
        let present: i64 = redis::cmd("BF.EXISTS")
            .arg(key)
            .arg(item)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(present == 1)
    }
}
