//! # ReelHub API Server
//!
//! This is the main API server for ReelHub, the backend of the branded
//! video community platform.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Brand / community / group / video resource endpoints
//! - Membership joins and group message feeds
//! - Redis-cached leaderboards and recency feeds
//! - Authentication (JWT bearer tokens) with per-IP rate limiting
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p reelhub-api
//! ```

use reelhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use reelhub_shared::{
    cache::{CacheAside, CacheClient},
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool},
    },
};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "ReelHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database pool and bring the schema up to date
    let pool = create_pool(config.database.clone()).await?;
    run_migrations(&pool).await?;

    // Connect the cache
    let cache_client = CacheClient::new(config.cache.clone()).await?;
    let cache = CacheAside::new(cache_client);

    // Build Axum application
    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), cache, config);
    let app = build_router(state);

    // Start server; connect info feeds the per-IP rate limiter
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
