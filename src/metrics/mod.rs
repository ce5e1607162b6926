//! Cache efficiency metrics
//!
//! Turns the cache service's cumulative counters into a [`MetricsSnapshot`].
//! The snapshot is a best-effort point-in-time read, not consistent with
//! concurrent traffic. Collection never fails: when the service is unreachable
//! or its answer is malformed, a zeroed snapshot carrying an `error` is
//! returned instead.

use serde::Serialize;
use tracing::{error, info};

use crate::cache::CacheBackend;
use crate::error::CacheResult;


/// Reported when the cache service does not say how much memory it uses.
pub const UNKNOWN_MEMORY: &str = "N/A";

// == Metrics Snapshot ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    pub total_requests: u64,
    /// hits / total_requests, 4 decimal places
    pub hit_ratio: f64,
    /// hit ratio × 100, 2 decimal places
    pub hit_ratio_percentage: f64,
    pub cache_keys: u64,
    pub used_memory: String,
    pub connected_clients: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricsSnapshot {
    /// Derives totals and ratios from raw counters.
    pub fn from_counters(
        keyspace_hits: u64,
        keyspace_misses: u64,
        cache_keys: u64,
        used_memory: Option<String>,
        connected_clients: u64,
    ) -> Self {
        let total_requests = keyspace_hits.saturating_add(keyspace_misses);
        let ratio = hit_ratio(keyspace_hits, total_requests);

        Self {
            keyspace_hits,
            keyspace_misses,
            total_requests,
            hit_ratio: round_to(ratio, 4),
            hit_ratio_percentage: round_to(ratio * 100.0, 2),
            cache_keys,
            used_memory: used_memory.unwrap_or_else(|| UNKNOWN_MEMORY.to_string()),
            connected_clients,
            error: None,
        }
    }

    /// Zeroed snapshot explaining why no counters could be read.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::from_counters(0, 0, 0, None, 0)
        }
    }
}

/// `hits / total`, or 0.0 when nothing has been looked up yet.
pub fn hit_ratio(hits: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Rounds to `places` decimal places, ties to even (`1/32` gives `0.0312`).
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

// == Aggregator ==
/// Reads the cache service's counters and summarizes them.
pub async fn collect(cache: &dyn CacheBackend) -> MetricsSnapshot {
    match read_counters(cache).await {
        Ok(snapshot) => {
            info!(
                backend = cache.name(),
                keyspace_hits = snapshot.keyspace_hits,
                keyspace_misses = snapshot.keyspace_misses,
                total_requests = snapshot.total_requests,
                cache_keys = snapshot.cache_keys,
                used_memory = %snapshot.used_memory,
                connected_clients = snapshot.connected_clients,
                "cache metrics: hit ratio {:.2}%",
                snapshot.hit_ratio_percentage
            );
            snapshot
        }
        Err(err) => {
            error!(backend = cache.name(), "error retrieving cache metrics: {}", err);
            MetricsSnapshot::unavailable(err.to_string())
        }
    }
}

async fn read_counters(cache: &dyn CacheBackend) -> CacheResult<MetricsSnapshot> {
    let info = cache.info().await?;
    let keys = cache.key_count().await?;
    Ok(MetricsSnapshot::from_counters(
        info.keyspace_hits,
        info.keyspace_misses,
        keys,
        info.used_memory_human,
        info.connected_clients,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheInfo, MemoryCache};
    use crate::error::CacheError;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Statistics source replying with a fixed result.
    struct FixedSource(std::result::Result<CacheInfo, &'static str>);

    #[async_trait]
    impl CacheBackend for FixedSource {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Ok(None)
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
            Ok(())
        }
        async fn flush(&self) -> CacheResult<()> {
            Ok(())
        }
        async fn info(&self) -> CacheResult<CacheInfo> {
            self.0
                .clone()
                .map_err(|msg| CacheError::Unavailable(msg.to_string()))
        }
        async fn key_count(&self) -> CacheResult<u64> {
            Ok(12)
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_eighty_twenty() {
        let snapshot = MetricsSnapshot::from_counters(80, 20, 5, Some("1.05M".into()), 2);
        assert_eq!(snapshot.total_requests, 100);
        assert_eq!(snapshot.hit_ratio, 0.8);
        assert_eq!(snapshot.hit_ratio_percentage, 80.0);
        assert_eq!(snapshot.used_memory, "1.05M");
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn test_zero_requests_no_division() {
        let snapshot = MetricsSnapshot::from_counters(0, 0, 0, None, 0);
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.hit_ratio, 0.0);
        assert_eq!(snapshot.hit_ratio_percentage, 0.0);
        assert_eq!(snapshot.used_memory, UNKNOWN_MEMORY);
    }

    #[test]
    fn test_rounding() {
        // 1 / 3 = 0.333333...
        let snapshot = MetricsSnapshot::from_counters(1, 2, 0, None, 0);
        assert_eq!(snapshot.hit_ratio, 0.3333);
        assert_eq!(snapshot.hit_ratio_percentage, 33.33);

        // 2 / 3 = 0.666666...
        let snapshot = MetricsSnapshot::from_counters(2, 1, 0, None, 0);
        assert_eq!(snapshot.hit_ratio, 0.6667);
        assert_eq!(snapshot.hit_ratio_percentage, 66.67);
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        // 1 / 32 = 0.03125
        let snapshot = MetricsSnapshot::from_counters(1, 31, 0, None, 0);
        assert_eq!(snapshot.hit_ratio, 0.0312);
        assert_eq!(snapshot.hit_ratio_percentage, 3.12);

        // 5 / 32 = 0.15625
        let snapshot = MetricsSnapshot::from_counters(5, 27, 0, None, 0);
        assert_eq!(snapshot.hit_ratio, 0.1562);
        assert_eq!(snapshot.hit_ratio_percentage, 15.62);

        // 3 / 32 = 0.09375 rounds up to the even digit
        let snapshot = MetricsSnapshot::from_counters(3, 29, 0, None, 0);
        assert_eq!(snapshot.hit_ratio, 0.0938);
    }

    #[test]
    fn test_unavailable_is_zeroed() {
        let snapshot = MetricsSnapshot::unavailable("boom");
        assert_eq!(snapshot.keyspace_hits, 0);
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.hit_ratio, 0.0);
        assert_eq!(snapshot.cache_keys, 0);
        assert_eq!(snapshot.used_memory, "N/A");
        assert_eq!(snapshot.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_collect_from_source() {
        let source = FixedSource(Ok(CacheInfo {
            keyspace_hits: 80,
            keyspace_misses: 20,
            used_memory_human: Some("2.00M".to_string()),
            connected_clients: 4,
        }));
        let snapshot = collect(&source).await;
        assert_eq!(snapshot.total_requests, 100);
        assert_eq!(snapshot.hit_ratio, 0.8);
        assert_eq!(snapshot.hit_ratio_percentage, 80.0);
        assert_eq!(snapshot.cache_keys, 12);
        assert_eq!(snapshot.connected_clients, 4);
    }

    #[tokio::test]
    async fn test_collect_unreachable_source() {
        let snapshot = collect(&FixedSource(Err("connection refused"))).await;
        assert_eq!(snapshot.total_requests, 0);
        assert!(snapshot.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_collect_from_memory_cache() {
        let cache = MemoryCache::new(10);
        cache.get("a").await.unwrap();
        cache.set("a", "1", Duration::from_secs(60)).await.unwrap();
        cache.get("a").await.unwrap();

        let snapshot = collect(&cache).await;
        assert_eq!(snapshot.keyspace_hits, 1);
        assert_eq!(snapshot.keyspace_misses, 1);
        assert_eq!(snapshot.hit_ratio, 0.5);
        assert_eq!(snapshot.cache_keys, 1);
    }
}
