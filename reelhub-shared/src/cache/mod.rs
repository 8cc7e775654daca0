/// Redis caching for expensive aggregation queries
///
/// This module provides the caching layer used by the read-side API:
/// - Connection pooling with automatic reconnection
/// - Read-through caching with TTL expiry (no invalidation on writes)
/// - Per-key request coalescing so a hot key is computed once per process
/// - Fixed-window counters for rate limiting
///
/// # Architecture
///
/// ```text
/// ┌─────────────┐  1. GET key   ┌─────────────┐
/// │   handler   │ ────────────> │    Redis    │
/// └─────────────┘               └─────────────┘
///        │                             ▲
///        │ 2. miss: SELECT ...         │
///        ▼                             │
/// ┌─────────────┐   3. SETEX key (TTL) │
/// │  Postgres   │ ─────────────────────┘
/// └─────────────┘
/// ```
///
/// Entries expire on their own; nothing is invalidated when the underlying
/// rows change, so cached reads can lag writes by up to one TTL.
///
/// # Example
///
/// ```no_run
/// use reelhub_shared::cache::{CacheAside, CacheClient, CacheConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = CacheConfig::from_env()?;
/// let client = CacheClient::new(config).await?;
/// let cache = CacheAside::new(client);
///
/// let healthy = cache.client().ping().await?;
/// println!("Redis healthy: {}", healthy);
/// # Ok(())
/// # }
/// ```

pub mod aside;
pub mod client;
pub mod keys;

// Re-export common types for convenience
pub use aside::CacheAside;
pub use client::{CacheClient, CacheConfig, CacheError};
