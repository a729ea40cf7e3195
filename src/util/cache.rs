//! Best-effort TTL cache for GET responses.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde_json::Value;

/// A small TTL + LRU cache keyed by request URL.
///
/// Entries older than the TTL are never returned. Lock poisoning is
/// tolerated: a panic elsewhere cannot make the cache unusable.
///
/// Every [`clear`](Self::clear) starts a new generation. A response fetched
/// before a clear is stored with [`insert_if_current`](Self::insert_if_current)
/// so it cannot outlive the write that caused the clear.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<RwLock<CacheInner>>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    max_entries: usize,
    ttl: Duration,
    generation: u64,
}

struct CacheEntry {
    value: Value,
    inserted_at: Instant,
    last_accessed: Instant,
}

impl ResponseCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                entries: HashMap::new(),
                max_entries: max_entries.max(1),
                ttl,
                generation: 0,
            })),
        }
    }

    /// Get a cached value by key, returning None if expired or missing.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let ttl = inner.ttl;

        let expired = inner.entries.get(key)?.inserted_at.elapsed() > ttl;
        if expired {
            inner.entries.remove(key);
            return None;
        }
        let entry = inner.entries.get_mut(key)?;
        entry.last_accessed = Instant::now();
        Some(entry.value.clone())
    }

    /// Current generation; read it before fetching a value to cache.
    pub fn generation(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Insert a value, evicting LRU if at capacity.
    pub fn insert(&self, key: String, value: Value) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.store(key, value);
    }

    /// Insert only if no clear happened since `generation` was read.
    ///
    /// Returns whether the value was stored.
    pub fn insert_if_current(&self, generation: u64, key: String, value: Value) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.generation != generation {
            return false;
        }
        inner.store(key, value);
        true
    }

    /// Clear all entries and start a new generation.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.entries.clear();
        inner.generation += 1;
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheInner {
    fn store(&mut self, key: String, value: Value) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.inserted_at.elapsed() <= ttl);

        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            if let Some(lru_key) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_accessed)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&lru_key);
            }
        }

        let now = Instant::now();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                last_accessed: now,
            },
        );
    }
}
