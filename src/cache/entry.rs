//! Cache Entry Module
//!
//! A stored response body together with its expiry deadline.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value. Every entry carries a TTL.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Deadline after which the entry is ignored
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Approximate bytes held by this entry under `key`.
    pub fn footprint(&self, key: &str) -> usize {
        key.len() + self.value.len() + std::mem::size_of::<Self>()
    }
}
