//! In-process cache service
//!
//! Wraps [`CacheStore`] behind the [`CacheBackend`] trait so the service runs
//! without an external Redis. Lookups take the write lock because they update
//! recency and counters.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::info::bytes_to_human;
use super::{CacheBackend, CacheInfo, CacheStats, CacheStore};
use crate::error::CacheResult;

#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    /// Drops expired entries; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    /// Cumulative counters, including evictions and expirations.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.store.write().await.get(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.store
            .write()
            .await
            .set(key.to_string(), value.to_string(), ttl)
    }

    async fn flush(&self) -> CacheResult<()> {
        self.store.write().await.flush();
        Ok(())
    }

    async fn info(&self) -> CacheResult<CacheInfo> {
        let store = self.store.read().await;
        let stats = store.stats();
        Ok(CacheInfo {
            keyspace_hits: stats.keyspace_hits,
            keyspace_misses: stats.keyspace_misses,
            used_memory_human: Some(bytes_to_human(store.used_bytes() as u64)),
            // The process itself is the only client.
            connected_clients: 1,
        })
    }

    async fn key_count(&self) -> CacheResult<u64> {
        Ok(self.store.read().await.len() as u64)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
