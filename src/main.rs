//! Mini Groupcache - A read-through byte cache server
//!
//! Serves one demo group backed by an in-memory "slow database".

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_groupcache::api::{create_router, AppState};
use mini_groupcache::{Config, HashRing, Registry};

/// Rows served by the demo group's loader.
const SLOW_DB: &[(&str, &str)] = &[
    ("harvester", "low fuel"),
    ("tractor", "cylinder failure"),
    ("trailer", "coolant temperature abnormal"),
    ("drone", "battery low"),
    ("greenhouse-sensor", "no network connection"),
];

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the demo group
/// 4. Build the peer hash ring
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_groupcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Groupcache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: group={}, cache_bytes={}, port={}, base_path={}",
        config.group_name, config.cache_bytes, config.server_port, config.base_path
    );

    let registry = Arc::new(Registry::new());
    let db: HashMap<&'static str, &'static str> = SLOW_DB.iter().copied().collect();
    registry.register(
        config.group_name.clone(),
        config.cache_bytes,
        move |key: &str| -> anyhow::Result<Vec<u8>> {
            info!("[SlowDB] search key {}", key);
            db.get(key)
                .map(|value| value.as_bytes().to_vec())
                .ok_or_else(|| anyhow!("{} not exist", key))
        },
    );

    // Placement only; requests are still answered by the local group
    let mut ring = HashRing::new(config.ring_replicas);
    ring.add_nodes(&config.peers);
    if ring.is_empty() {
        info!("No peers configured, all keys are owned locally");
    } else {
        info!(
            "Hash ring built: peers={:?}, virtual_nodes={}",
            ring.nodes(),
            ring.len()
        );
    }

    let app = create_router(AppState::from_config(registry, &config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}{}", addr, config.base_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
