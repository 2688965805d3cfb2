//! Group Module
//!
//! A group is a named cache namespace: one byte-budgeted cache plus the
//! loader that fills it on a miss.

mod registry;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{ByteView, CacheStats, SharedCache};
use crate::error::{CacheError, Result};

pub use registry::Registry;

// == Loader ==
/// Fetches the authoritative value for a key when the cache has none.
///
/// Any `Fn(&str) -> anyhow::Result<Vec<u8>>` closure is a loader.
pub trait Loader: Send + Sync {
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

impl<F> Loader for F
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self(key)
    }
}

// == Group Stats ==
/// Cache counters plus loader activity for one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub cache: CacheStats,
    /// Loader invocations, successful or not
    pub loads: u64,
    /// Loader invocations that returned an error
    pub load_errors: u64,
}

// == Group ==
/// Cache-aside namespace.
///
/// Concurrent misses on the same key are not coalesced: each caller runs the
/// loader on its own.
pub struct Group {
    name: String,
    loader: Box<dyn Loader>,
    cache: SharedCache<ByteView>,
    loads: AtomicU64,
    load_errors: AtomicU64,
}

impl Group {
    /// Creates a group; use [`Registry::register`] to make it discoverable.
    pub(crate) fn new(name: String, cache_bytes: u64, loader: impl Loader + 'static) -> Self {
        let group_name = name.clone();
        let cache = SharedCache::<ByteView>::new(cache_bytes).with_on_evicted(Arc::new(
            move |key: &str, value: &ByteView| {
                debug!(group = %group_name, key, bytes = value.len(), "evicted entry");
            },
        ));

        Self {
            name,
            loader: Box::new(loader),
            cache,
            loads: AtomicU64::new(0),
            load_errors: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Returns the value for `key`, loading and caching it on a miss.
    ///
    /// Loader failures are returned as is and nothing is cached for them.
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        debug!(group = %self.name, key, "cache miss");
        self.load(key)
    }

    // Peer selection goes here once keys can be owned by other nodes; for
    // now every key is owned locally.
    fn load(&self, key: &str) -> Result<ByteView> {
        self.get_locally(key)
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        self.loads.fetch_add(1, Ordering::Relaxed);

        let bytes = self.loader.load(key).map_err(|err| {
            self.load_errors.fetch_add(1, Ordering::Relaxed);
            warn!(group = %self.name, key, error = %err, "loader failed");
            CacheError::Loader(err)
        })?;

        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.cache.add(key, value);
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStats {
        GroupStats {
            cache: self.cache.stats(),
            loads: self.loads.load(Ordering::Relaxed),
            load_errors: self.load_errors.load(Ordering::Relaxed),
        }
    }

    /// Byte budget of this group's cache (0 = unbounded).
    pub fn cache_bytes(&self) -> u64 {
        self.cache.max_bytes()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
