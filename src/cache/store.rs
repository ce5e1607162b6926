//! Cache Store Module
//!
//! Key-value storage for the in-process cache service: HashMap storage with
//! LRU tracking, TTL expiration and Redis-style counters.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, CacheResult};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Cumulative counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Sum of entry footprints
    used_bytes: usize,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            used_bytes: 0,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// An existing key is overwritten and its TTL reset. At capacity, the least
    /// recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: String, ttl: Duration) -> CacheResult<()> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidEntry(format!(
                "Key must be 1..={} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidEntry(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if let Some(previous) = self.entries.remove(&key) {
            self.used_bytes -= previous.footprint(&key);
        } else {
            while self.entries.len() >= self.max_entries {
                let Some(evicted) = self.lru.evict_oldest() else {
                    break;
                };
                self.drop_entry(&evicted);
                self.stats.record_eviction();
            }
        }

        let entry = CacheEntry::new(value, ttl);
        self.used_bytes += entry.footprint(&key);
        self.lru.touch(&key);
        self.entries.insert(key, entry);
        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`, counting a hit or a miss.
    ///
    /// Expired entries are removed on access and count as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.drop_entry(key);
            self.lru.remove(key);
            self.stats.record_expired(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Flush ==
    /// Removes every entry. Counters are cumulative and survive a flush.
    pub fn flush(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.used_bytes = 0;
        removed
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.drop_entry(key);
            self.lru.remove(key);
        }

        self.stats.record_expired(expired_keys.len());
        expired_keys.len()
    }

    fn drop_entry(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.used_bytes -= entry.footprint(key);
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Number of stored entries, expired-but-unswept ones included (like DBSIZE).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(900);

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert!(store.is_empty());
        assert_eq!(store.used_bytes(), 0);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100);
        store.set("k".to_string(), "v".to_string(), TTL).unwrap();

        assert_eq!(store.get("k").as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
        assert!(store.used_bytes() > 0);
    }

    #[test]
    fn test_store_get_nonexistent_counts_miss() {
        let mut store = CacheStore::new(100);
        assert!(store.get("missing").is_none());
        assert_eq!(store.stats().keyspace_misses, 1);
        assert_eq!(store.stats().keyspace_hits, 0);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100);
        store.set("k".to_string(), "v1".to_string(), TTL).unwrap();
        store.set("k".to_string(), "v2".to_string(), TTL).unwrap();

        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100);
        store
            .set("k".to_string(), "v".to_string(), Duration::from_millis(50))
            .unwrap();
        assert!(store.get("k").is_some());

        sleep(Duration::from_millis(80));

        assert!(store.get("k").is_none());
        let stats = store.stats();
        assert_eq!(stats.keyspace_hits, 1);
        assert_eq!(stats.keyspace_misses, 1);
        assert_eq!(stats.expired_keys, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3);
        for key in ["k1", "k2", "k3"] {
            store.set(key.to_string(), "v".to_string(), TTL).unwrap();
        }
        store.get("k1");
        store.set("k4".to_string(), "v".to_string(), TTL).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.stats().evicted_keys, 1);
        assert!(store.get("k2").is_none());
        assert!(store.get("k1").is_some());
    }

    #[test]
    fn test_store_flush_keeps_counters() {
        let mut store = CacheStore::new(100);
        store.set("a".to_string(), "1".to_string(), TTL).unwrap();
        store.set("b".to_string(), "2".to_string(), TTL).unwrap();
        store.get("a");

        assert_eq!(store.flush(), 2);
        assert!(store.is_empty());
        assert_eq!(store.used_bytes(), 0);
        assert!(store.get("a").is_none());

        let stats = store.stats();
        assert_eq!(stats.keyspace_hits, 1);
        assert_eq!(stats.keyspace_misses, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(100);
        store
            .set("short".to_string(), "v".to_string(), Duration::from_millis(50))
            .unwrap();
        store.set("long".to_string(), "v".to_string(), TTL).unwrap();

        sleep(Duration::from_millis(80));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }

    #[test]
    fn test_store_rejects_bad_entries() {
        let mut store = CacheStore::new(100);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        assert!(matches!(
            store.set(long_key, "v".to_string(), TTL),
            Err(CacheError::InvalidEntry(_))
        ));
        assert!(matches!(
            store.set(String::new(), "v".to_string(), TTL),
            Err(CacheError::InvalidEntry(_))
        ));
        let large = "x".repeat(MAX_VALUE_SIZE + 1);
        assert!(matches!(
            store.set("k".to_string(), large, TTL),
            Err(CacheError::InvalidEntry(_))
        ));
    }
}
