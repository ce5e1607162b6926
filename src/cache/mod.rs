//! Cache Module
//!
//! The cache service abstraction and everything built on it:
//! - [`CacheBackend`]: get / set-with-TTL / flush / info / key count
//! - [`MemoryCache`]: in-process service with TTL expiration and LRU eviction
//! - [`RedisCache`]: Redis-backed service
//! - [`middleware::cache_page`]: read-through response cache
//! - [`invalidation::invalidate_all`]: full flush after writes

mod backend;
mod entry;
mod fingerprint;
mod info;
pub mod invalidation;
mod lru;
mod memory;
pub mod middleware;
mod redis;
mod stats;
mod store;


// Re-export public types
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use fingerprint::fingerprint;
pub use info::{bytes_to_human, CacheInfo};
pub use invalidation::{invalidate_all, WriteKind};
pub use lru::LruTracker;
pub use memory::MemoryCache;
pub use middleware::{cache_page, ResponseCache};
pub use self::redis::RedisCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 16 * 1024 * 1024; // 16 MB
