//! The key-value cache service seen by the rest of the crate.

use std::time::Duration;

use async_trait::async_trait;

use super::CacheInfo;
use crate::error::CacheResult;

/// Operations the response cache, the invalidation trigger and the metrics
/// aggregator need from a cache service.
///
/// Callers treat every error as non-fatal.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Live value under `key`, `None` on a miss.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Removes every key in the namespace.
    async fn flush(&self) -> CacheResult<()>;

    /// Cumulative hit/miss counters and service details.
    async fn info(&self) -> CacheResult<CacheInfo>;

    /// Number of keys currently stored.
    async fn key_count(&self) -> CacheResult<u64>;

    fn name(&self) -> &'static str;
}
