//! In-memory TTL cache backed by `DashMap`.

use dashmap::DashMap;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Keyed cache with time-to-live expiration.
///
/// Expired entries are lazily evicted on the next `get` for that key.
/// A zero TTL turns the cache off: `set` stores nothing.
pub struct MemoryCache<V> {
    store: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> MemoryCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: DashMap::new(),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Returns the cached value for `key`, or `None` if missing or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.store.get(key)?;
        if Instant::now() >= entry.expires_at {
            drop(entry);
            self.store.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    /// Inserts or overwrites an entry that expires after the configured TTL.
    pub fn set(&self, key: String, value: V) {
        if !self.is_enabled() {
            return;
        }
        self.store.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}
