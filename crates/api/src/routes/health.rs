//! Health check endpoint handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: StorageHealth,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageHealth {
    /// `postgres` or `memory`.
    pub backend: String,
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Pings the database when one is configured. The in-memory store is
/// always reachable.
async fn probe_storage(state: &AppState) -> StorageHealth {
    let Some(pool) = state.stores.pool.as_ref() else {
        return StorageHealth {
            backend: "memory".to_string(),
            connected: true,
            latency_ms: Some(0),
        };
    };

    let start = std::time::Instant::now();
    let connected = sqlx::query("SELECT 1").execute(pool).await.is_ok();
    persistence::metrics::record_pool_metrics(pool);

    StorageHealth {
        backend: "postgres".to_string(),
        connected,
        latency_ms: connected.then(|| start.elapsed().as_millis() as u64),
    }
}

fn ensure_connected(storage: &StorageHealth) -> Result<(), ApiError> {
    if storage.connected {
        return Ok(());
    }
    tracing::warn!(backend = %storage.backend, "Health check failed: storage unreachable");
    Err(ApiError::ServiceUnavailable(format!(
        "{} storage is unreachable",
        storage.backend
    )))
}

/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let storage = probe_storage(&state).await;
    ensure_connected(&storage)?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage,
    }))
}

/// GET /api/health/live
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    ensure_connected(&probe_storage(&state).await)?;
    Ok(Json(StatusResponse {
        status: "ready".to_string(),
    }))
}
