//! Bounded caching for the pipeline
//!
//! Thread-safe LRU cache with hit/miss accounting. The inflection engine
//! keeps one for finished phrase inflections and one for morphological
//! parses; both are bounded so long corpus runs cannot grow without limit.

use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;
use serde::Serialize;

/// Thread-safe LRU cache with basic metrics.
#[derive(Debug)]
pub struct EngineCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    cache: Mutex<LruCache<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Counters observed on an [`EngineCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub len: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl<K, V> EngineCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Create a cache bounded to `capacity` entries (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("non-zero after max(1)");
        EngineCache {
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up a key, promoting it to most-recently-used on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        match cache.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a value, evicting the least-recently-used entry when full.
    pub fn insert(&self, key: K, value: V) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if cache.len() == cache.cap().get() && !cache.contains(&key) {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        cache.put(key, value);
    }

    /// Look up a key or compute, insert and return the value.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        K: Clone,
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            len: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
