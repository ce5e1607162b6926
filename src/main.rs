//! Property Cache - property listings API with a read-through response cache

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use property_cache::cache::{CacheBackend, MemoryCache, RedisCache};
use property_cache::store::{PropertyRepository, SqlitePropertyStore};
use property_cache::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the property service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the SQLite property store
/// 4. Connect the cache service (Redis, or the in-process cache)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "property_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting property service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, database={}, cache_ttl={}s, redis={}",
        config.server_port,
        config.database_path,
        config.cache_ttl,
        config.redis_url.is_some()
    );

    let properties: Arc<dyn PropertyRepository> = Arc::new(
        SqlitePropertyStore::open(&config.database_path)
            .with_context(|| format!("failed to open database at {}", config.database_path))?,
    );

    let (cache, cleanup_handle) = connect_cache(&config).await;
    info!(
        store = properties.backend_name(),
        cache = cache.name(),
        "Backends ready"
    );

    let state = AppState::from_config(&config, properties, cache);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Connects to Redis when configured, otherwise (or if Redis is unreachable at
/// startup) runs the in-process cache with its expiry sweep.
async fn connect_cache(config: &Config) -> (Arc<dyn CacheBackend>, Option<JoinHandle<()>>) {
    if let Some(url) = &config.redis_url {
        match RedisCache::connect(url).await {
            Ok(redis) => return (Arc::new(redis), None),
            Err(err) => warn!("Redis unavailable ({}), falling back to in-process cache", err),
        }
    }

    let memory = MemoryCache::new(config.cache_max_entries);
    let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
    (Arc::new(memory), Some(handle))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
