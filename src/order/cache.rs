//! Read-through/write-through cache for order documents.
//!
//! Keyspace `user:{user_id}_order:{order_id}`, TTL 15 minutes by default
//! (configurable via [`crate::config::AppConfig::order_cache_ttl`]).

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

use crate::contracts::types::Order;

pub struct OrderCache {
    conn: ConnectionManager,
    ttl: Duration,
}

impl OrderCache {
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, ttl })
    }

    fn key(user_id: i64, order_id: i64) -> String {
        format!("user:{user_id}_order:{order_id}")
    }

    pub async fn get(&self, user_id: i64, order_id: i64) -> Option<Order> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::key(user_id, order_id)).await.ok().flatten();
        raw.and_then(|s| serde_json::from_str(&s).ok())
    }

    /// Writes `order` into the cache, keyed from `order` itself so the
    /// caller never has to re-read the row it just wrote (avoids the
    /// stale-read race of a separate fetch-after-write).
    pub async fn put(&self, order: &Order) -> Result<(), redis::RedisError> {
        let mut conn = self.conn.clone();
        let payload = serde_json::to_string(order)
            .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "serialize", e.to_string())))?;
        conn.set_ex::<_, _, ()>(
            Self::key(order.user_id, order.order_id),
            payload,
            self.ttl.as_secs(),
        )
        .await
    }

    pub async fn invalidate(&self, user_id: i64, order_id: i64) -> Result<(), redis::RedisError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(user_id, order_id)).await
    }
}
