//! Redis cache service
//!
//! Uses a `ConnectionManager`, which multiplexes one connection across tasks
//! and reconnects on its own after the server goes away. Every call clones the
//! manager handle; clones are cheap and share the underlying connection.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::info;

use super::{CacheBackend, CacheInfo};
use crate::error::CacheResult;

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connects to `url` (e.g. `redis://127.0.0.1:6379/1`).
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        info!("Connected to Redis cache service");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(px_millis(ttl))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn flush(&self) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }

    async fn info(&self) -> CacheResult<CacheInfo> {
        let mut conn = self.conn.clone();
        let text: String = redis::cmd("INFO").query_async(&mut conn).await?;
        CacheInfo::from_info_text(&text)
    }

    async fn key_count(&self) -> CacheResult<u64> {
        let mut conn = self.conn.clone();
        let count: u64 = redis::cmd("DBSIZE").query_async(&mut conn).await?;
        Ok(count)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// `PX` argument for `ttl`: at least 1 ms, saturating at `u64::MAX`.
fn px_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}
