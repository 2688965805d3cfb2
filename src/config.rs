//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::ring::DEFAULT_REPLICAS;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// URL prefix for `<base_path>/<group>/<key>` requests
    pub base_path: String,
    /// Name of the group registered at startup
    pub group_name: String,
    /// Byte budget of that group's cache (0 = unbounded)
    pub cache_bytes: u64,
    /// Virtual nodes per peer on the hash ring
    pub ring_replicas: usize,
    /// Peer identifiers placed on the hash ring
    pub peers: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 9999)
    /// - `BASE_PATH` - Cache URL prefix (default: /_cache)
    /// - `GROUP_NAME` - Startup group name (default: scores)
    /// - `CACHE_BYTES` - Startup group byte budget (default: 2048)
    /// - `RING_REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `PEERS` - Comma-separated peer identifiers (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            base_path: env::var("BASE_PATH")
                .map(|v| normalize_base_path(&v))
                .unwrap_or(defaults.base_path),
            group_name: env::var("GROUP_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.group_name),
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_bytes),
            ring_replicas: env::var("RING_REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.ring_replicas),
            peers: env::var("PEERS")
                .map(|v| parse_peers(&v))
                .unwrap_or(defaults.peers),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 9999,
            base_path: "/_cache".to_string(),
            group_name: "scores".to_string(),
            cache_bytes: 2048,
            ring_replicas: DEFAULT_REPLICAS,
            peers: Vec::new(),
        }
    }
}

/// Ensures a single leading slash and no trailing slash.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    format!("/{}", trimmed)
}

fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
