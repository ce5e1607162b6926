//! Cache Statistics Module
//!
//! Cumulative counters for the in-process cache, named after the Redis INFO
//! fields they stand in for.

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub keyspace_hits: u64,
    /// Lookups that found nothing, or only an expired entry
    pub keyspace_misses: u64,
    /// Entries dropped to make room
    pub evicted_keys: u64,
    /// Entries dropped because their TTL elapsed
    pub expired_keys: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.keyspace_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.keyspace_misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evicted_keys += 1;
    }

    pub fn record_expired(&mut self, count: usize) {
        self.expired_keys += count as u64;
    }
}
