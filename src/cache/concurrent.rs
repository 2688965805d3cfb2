//! Shared Cache Module
//!
//! Thread-safe wrapper around a lazily created [`LruStore`].

use std::fmt;

use parking_lot::Mutex;

use crate::cache::{ByteSize, CacheStats, LruStore, OnEvicted};

struct Inner<V> {
    /// None until the first write; built exactly once under the lock.
    store: Option<LruStore<V>>,
    stats: CacheStats,
}

// == Shared Cache ==
/// One `LruStore` behind a single mutex.
///
/// `get` reorders recency, so reads and writes take the same exclusive lock.
/// The store itself is only allocated on the first `add`.
pub struct SharedCache<V> {
    max_bytes: u64,
    on_evicted: Option<OnEvicted<V>>,
    inner: Mutex<Inner<V>>,
}

impl<V: ByteSize + Clone> SharedCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget (0 = unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            on_evicted: None,
            inner: Mutex::new(Inner {
                store: None,
                stats: CacheStats::new(),
            }),
        }
    }

    /// Sets the callback handed to the store when it is created.
    pub fn with_on_evicted(mut self, on_evicted: OnEvicted<V>) -> Self {
        self.on_evicted = Some(on_evicted);
        self
    }

    // == Add ==
    /// Inserts or updates `key`, creating the underlying store if needed.
    pub fn add(&self, key: &str, value: V) {
        let mut inner = self.inner.lock();
        let store = inner.store.get_or_insert_with(|| {
            let store = LruStore::new(self.max_bytes);
            match &self.on_evicted {
                Some(on_evicted) => store.with_on_evicted(on_evicted.clone()),
                None => store,
            }
        });
        store.add(key, value);
    }

    // == Get ==
    /// Returns a clone of the cached value, refreshing its recency.
    ///
    /// Never creates the store.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();
        let found = inner
            .store
            .as_mut()
            .and_then(|store| store.get(key).cloned());

        match found {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        found
    }
}

impl<V> SharedCache<V> {
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// True once the first write has created the store.
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().store.is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().store.as_ref().map_or(0, LruStore::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns hit/miss counters together with the store's occupancy.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        if let Some(store) = &inner.store {
            stats.evictions = store.evictions();
            stats.total_entries = store.len();
            stats.used_bytes = store.used_bytes();
        }
        stats
    }
}

impl<V> fmt::Debug for SharedCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache")
            .field("max_bytes", &self.max_bytes)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
