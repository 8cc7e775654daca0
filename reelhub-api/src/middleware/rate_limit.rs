/// Rate limiting middleware for authentication endpoints
///
/// This module implements fixed-window rate limiting with Redis-backed
/// counters so limits hold across API instances. Limits are applied per
/// client IP to slow down credential stuffing against `/auth/*`.
///
/// # Algorithm
///
/// Fixed window:
/// - First request in a window INCRs the counter and sets its TTL
/// - Every request increments the counter
/// - Request blocked once the counter exceeds the configured maximum
/// - Counter expires with the window, resetting the budget
///
/// # Storage
///
/// State stored in Redis with keys: `ratelimit:auth:{client_ip}`
/// TTL: the configured window (default 15 minutes)
///
/// # Degraded mode
///
/// If Redis is unreachable the middleware lets requests through. Login
/// keeps working during a cache outage; the window resumes when Redis
/// returns.
///
/// # Headers
///
/// 429 responses include `Retry-After` with the window length in seconds.

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

/// Rate limiting middleware layer for `/auth/*`
///
/// Counts requests per client IP in a fixed window. Returns 429 once the
/// window budget is spent.
///
/// # Errors
///
/// - 429 Too Many Requests: window budget exhausted for this client
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(&request);
    let max_attempts = state.config.rate_limit.auth_max_attempts;
    let window_secs = state.config.rate_limit.auth_window_secs;

    match state.cache.client().incr_window(&key, window_secs).await {
        Ok(count) if count > max_attempts => {
            tracing::warn!("Rate limit exceeded for {}: {} attempts", key, count);
            Err(ApiError::RateLimitExceeded {
                retry_after: window_secs,
                message: format!(
                    "Too many authentication attempts. Try again in {} seconds",
                    window_secs
                ),
            })
        }
        Ok(_) => Ok(next.run(request).await),
        Err(err) => {
            // Degrade open: an unreachable Redis must not lock users out
            tracing::warn!("Rate limit check unavailable, allowing request: {}", err);
            Ok(next.run(request).await)
        }
    }
}

/// Builds the Redis counter key for the requesting client
///
/// Uses the peer address recorded by `into_make_service_with_connect_info`.
/// Requests without one (e.g. in tests that call the router directly) share
/// a single `unknown` bucket.
fn client_key(request: &Request) -> String {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!("ratelimit:auth:{}", ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_client_key_uses_peer_address() {
        let mut request = axum::http::Request::builder()
            .uri("/auth/login")
            .body(Body::empty())
            .unwrap();

        let addr: SocketAddr = "203.0.113.9:51234".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));

        assert_eq!(client_key(&request), "ratelimit:auth:203.0.113.9");
    }

    #[test]
    fn test_client_key_without_peer_address() {
        let request = axum::http::Request::builder()
            .uri("/auth/login")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&request), "ratelimit:auth:unknown");
    }
}
