//! Explicit TTL cache for warehouse reads.
//!
//! One slot per cached query. A value is *fresh* within the TTL and *stale*
//! afterwards; stale values are kept around so a failed refresh can fall
//! back to the last known result instead of erroring the whole request.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// A single-slot cache with a time-to-live and an explicit invalidation
/// entry point.
pub struct TtlCache<T> {
    ttl: Duration,
    slot: RwLock<Option<Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    /// Creates an empty cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Returns the cached value if it is still fresh.
    pub async fn get(&self) -> Option<T> {
        let guard = self.slot.read().await;
        guard
            .as_ref()
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Returns the cached value regardless of age. Used as a fallback when
    /// a refresh query fails.
    pub async fn get_stale(&self) -> Option<T> {
        let guard = self.slot.read().await;
        guard.as_ref().map(|entry| entry.value.clone())
    }

    /// Stores a value, resetting its age.
    pub async fn put(&self, value: T) {
        let mut guard = self.slot.write().await;
        *guard = Some(Entry {
            value,
            stored_at: Instant::now(),
        });
    }

    /// Drops the cached value.
    pub async fn invalidate(&self) {
        let mut guard = self.slot.write().await;
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_value_is_returned() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put(vec![1, 2, 3]).await;
        assert_eq!(cache.get().await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn expired_value_is_only_available_stale() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.put(7_u32).await;
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get().await, None);
        assert_eq!(cache.get_stale().await, Some(7));
    }

    #[tokio::test]
    async fn invalidate_drops_stale_fallback_too() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("cached".to_string()).await;
        cache.invalidate().await;
        assert_eq!(cache.get().await, None);
        assert_eq!(cache.get_stale().await, None);
    }

    #[tokio::test]
    async fn put_resets_age() {
        let cache = TtlCache::new(Duration::from_millis(30));
        cache.put(1_u8).await;
        std::thread::sleep(Duration::from_millis(20));
        cache.put(2_u8).await;
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get().await, Some(2));
    }
}
