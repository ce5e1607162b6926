//! Expiry sweep for the in-process cache
//!
//! Expired entries are already ignored on read. The sweep removes the ones
//! nobody reads again so `cache_keys` and `used_memory` in the metrics stay
//! close to the truth.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Starts sweeping `cache` every `every_secs` seconds (at least one).
///
/// The task runs until its handle is aborted.
pub fn spawn_cleanup_task(cache: MemoryCache, every_secs: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(every_secs.max(1));

    tokio::spawn(async move {
        info!(period_secs = period.as_secs(), "cache expiry sweep started");

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can have expired yet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = cache.purge_expired().await;
            if removed == 0 {
                debug!("cache expiry sweep: nothing to remove");
                continue;
            }
            let remaining = cache.len().await;
            let stats = cache.stats().await;
            info!(
                removed,
                remaining,
                expired_total = stats.expired_keys,
                evicted_total = stats.evicted_keys,
                "cache expiry sweep"
            );
        }
    })
}
