//! Mini Groupcache - A read-through byte cache
//!
//! Named groups sit in front of a slow data source: each group checks its
//! byte-budgeted LRU cache and falls back to a caller-supplied loader on a
//! miss. A consistent-hash ring is provided for placing keys on nodes.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod ring;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Group, GroupStats, Loader, Registry};
pub use ring::HashRing;
