//! API Handlers
//!
//! HTTP request handlers for the cache server endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::group::Registry;
use crate::models::{GroupStatsResponse, HealthResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups reachable over HTTP
    pub registry: Arc<Registry>,
    /// Prefix under which `<group>/<key>` requests are served
    pub base_path: String,
}

impl AppState {
    /// Creates a new AppState serving `registry` under `base_path`.
    pub fn new(registry: Arc<Registry>, base_path: impl Into<String>) -> Self {
        Self {
            registry,
            base_path: base_path.into(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(registry: Arc<Registry>, config: &Config) -> Self {
        Self::new(registry, config.base_path.clone())
    }
}

/// Splits `<group>/<key>` at the first slash; the key may contain slashes.
pub fn split_cache_path(path: &str) -> Result<(&str, &str)> {
    match path.split_once('/') {
        Some((group, key)) if !group.is_empty() => Ok((group, key)),
        _ => Err(CacheError::InvalidRequest(format!(
            "expected <group>/<key>, got '{}'",
            path
        ))),
    }
}

/// Handler for GET `<base_path>/<group>/<key>`
///
/// Serves the value's raw bytes. The group's loader may block, so the lookup
/// runs on the blocking thread pool.
pub async fn cache_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse> {
    let (group_name, key) = split_cache_path(&path)?;
    debug!(group = group_name, key, "cache request");

    let group = state
        .registry
        .lookup(group_name)
        .ok_or_else(|| CacheError::GroupNotFound(group_name.to_string()))?;

    let key = key.to_string();
    let value = tokio::task::spawn_blocking(move || group.get(&key))
        .await
        .map_err(|err| CacheError::Internal(err.to_string()))??;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value.to_bytes(),
    ))
}

/// Handler for GET /stats/:group
///
/// Returns hit/miss, occupancy and loader counters for one group.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Json<GroupStatsResponse>> {
    let group = state
        .registry
        .lookup(&group_name)
        .ok_or_else(|| CacheError::GroupNotFound(group_name.clone()))?;

    Ok(Json(GroupStatsResponse::new(
        group.name(),
        group.cache_bytes(),
        &group.stats(),
    )))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.registry.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn test_state() -> AppState {
        let registry = Arc::new(Registry::new());
        registry.register("scores", 1024, |key: &str| -> anyhow::Result<Vec<u8>> {
            match key {
                "tom" => Ok(b"630".to_vec()),
                _ => Err(anyhow!("{} not exist", key)),
            }
        });
        AppState::new(registry, "/_cache")
    }

    #[test]
    fn test_split_cache_path() {
        assert_eq!(split_cache_path("scores/tom").unwrap(), ("scores", "tom"));
        assert_eq!(split_cache_path("scores/a/b").unwrap(), ("scores", "a/b"));
        assert_eq!(split_cache_path("scores/").unwrap(), ("scores", ""));
        assert!(split_cache_path("scores").is_err());
        assert!(split_cache_path("/tom").is_err());
    }

    #[tokio::test]
    async fn test_cache_handler_hit() {
        let state = test_state();

        let response = cache_handler(State(state), Path("scores/tom".to_string()))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_cache_handler_unknown_group() {
        let state = test_state();

        let result = cache_handler(State(state), Path("missing/tom".to_string())).await;
        assert!(matches!(result, Err(CacheError::GroupNotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_cache_handler_empty_key() {
        let state = test_state();

        let result = cache_handler(State(state), Path("scores/".to_string())).await;
        assert!(matches!(result, Err(CacheError::EmptyKey)));
    }

    #[tokio::test]
    async fn test_cache_handler_loader_error() {
        let state = test_state();

        let result = cache_handler(State(state), Path("scores/kate".to_string())).await;
        match result {
            Err(err) => assert_eq!(err.to_string(), "kate not exist"),
            Ok(_) => panic!("expected loader error"),
        }
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        cache_handler(State(state.clone()), Path("scores/tom".to_string()))
            .await
            .unwrap();

        let response = stats_handler(State(state), Path("scores".to_string()))
            .await
            .unwrap();
        assert_eq!(response.loads, 1);
        assert_eq!(response.misses, 1);
        assert_eq!(response.total_entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.groups, 1);
    }
}
