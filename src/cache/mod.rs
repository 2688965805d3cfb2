//! Cache Module
//!
//! Byte-budgeted LRU storage and its thread-safe, lazily created wrapper.

mod byteview;
mod concurrent;
mod lru;
mod stats;


// Re-export public types
pub use byteview::ByteView;
pub use concurrent::SharedCache;
pub use lru::{ByteSize, Iter, LruStore, OnEvicted};
pub use stats::CacheStats;
