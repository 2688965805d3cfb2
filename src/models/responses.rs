//! Response DTOs for the cache server API
//!
//! Defines the JSON bodies of the auxiliary endpoints. Cached values
//! themselves are served as raw bytes.

use serde::Serialize;

use crate::group::GroupStats;

/// Response body for the stats endpoint (GET /stats/:group)
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    /// Group name
    pub group: String,
    /// Byte budget of the group's cache (0 = unbounded)
    pub cache_bytes: u64,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Bytes currently held (keys plus values)
    pub used_bytes: u64,
    /// Loader invocations
    pub loads: u64,
    /// Failed loader invocations
    pub load_errors: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    /// Creates a new GroupStatsResponse from a group's statistics
    pub fn new(group: impl Into<String>, cache_bytes: u64, stats: &GroupStats) -> Self {
        Self {
            group: group.into(),
            cache_bytes,
            hits: stats.cache.hits,
            misses: stats.cache.misses,
            evictions: stats.cache.evictions,
            total_entries: stats.cache.total_entries,
            used_bytes: stats.cache.used_bytes,
            loads: stats.loads,
            load_errors: stats.load_errors,
            hit_rate: stats.cache.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Number of registered groups
    pub groups: usize,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(groups: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            groups,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
