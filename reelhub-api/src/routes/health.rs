/// Health check endpoints
///
/// Provides two probes:
/// - `GET /health`: liveness, answers as long as the process runs
/// - `GET /health/ready`: readiness, verifies database and cache connectivity
///
/// # Response
///
/// ```json
/// {
///   "status": "ready",
///   "version": "0.1.0",
///   "database": "connected",
///   "cache": "connected"
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use reelhub_shared::db::pool::health_check as db_health_check;
use serde::{Deserialize, Serialize};

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service name
    pub service: String,

    /// Service status
    pub status: String,

    /// Application version
    pub version: String,
}

/// Readiness response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Cache status
    pub cache: String,
}

/// Liveness handler
///
/// Does not touch any dependency. Use this for restart decisions; a
/// process that answers is alive even when Postgres or Redis is down.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "reelhub-api".to_string(),
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness handler
///
/// Pings the database and the cache. Answers 503 naming the failed
/// dependency when either is unreachable, so load balancers stop
/// routing traffic here until both recover.
///
/// # Endpoint
///
/// ```text
/// GET /health/ready
/// ```
pub async fn readiness_check(
    State(state): State<AppState>,
) -> ApiResult<Json<ReadinessResponse>> {
    db_health_check(&state.db).await.map_err(|e| {
        tracing::error!("Database readiness check failed: {}", e);
        ApiError::ServiceUnavailable("Database unavailable".to_string())
    })?;

    let cache_ok = state.cache.client().ping().await.map_err(|e| {
        tracing::error!("Cache readiness check failed: {}", e);
        ApiError::ServiceUnavailable("Cache unavailable".to_string())
    })?;
    if !cache_ok {
        return Err(ApiError::ServiceUnavailable("Cache unavailable".to_string()));
    }

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: "connected".to_string(),
        cache: "connected".to_string(),
    }))
}
