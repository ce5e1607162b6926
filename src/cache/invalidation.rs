//! Cache invalidation after writes
//!
//! Any successful create, update or delete flushes the whole cache namespace.
//! Cached responses are not tracked per record. Call this only after the
//! write has committed.

use tracing::{info, warn};

use super::CacheBackend;

/// The write that triggered a flush, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Create,
    Update,
    Delete,
}

impl WriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Create => "create",
            WriteKind::Update => "update",
            WriteKind::Delete => "delete",
        }
    }
}

/// Flushes the cache after a committed write.
///
/// Returns whether the flush succeeded. A failed flush is logged and never
/// turns the write into an error; stale entries then live until their TTL.
pub async fn invalidate_all(cache: &dyn CacheBackend, kind: WriteKind, property_id: i64) -> bool {
    match cache.flush().await {
        Ok(()) => {
            info!(
                property_id,
                write = kind.as_str(),
                backend = cache.name(),
                "cache flushed after write"
            );
            true
        }
        Err(err) => {
            warn!(
                property_id,
                write = kind.as_str(),
                backend = cache.name(),
                "cache flush after write failed: {}",
                err
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::time::Duration;

    #[tokio::test]
    async fn test_invalidate_all_flushes_every_key() {
        let cache = MemoryCache::new(10);
        cache
            .set("a", "1", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("b", "2", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(invalidate_all(&cache, WriteKind::Create, 1).await);
        assert!(cache.is_empty().await);
    }

    #[test]
    fn test_write_kind_labels() {
        assert_eq!(WriteKind::Create.as_str(), "create");
        assert_eq!(WriteKind::Update.as_str(), "update");
        assert_eq!(WriteKind::Delete.as_str(), "delete");
    }
}
