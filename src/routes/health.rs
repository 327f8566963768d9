//! `GET /health` (§6.1, supplemented per SPEC_FULL.md with a subsystem
//! breakdown beyond the bare liveness check).

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<Utc>,
    pub subsystems: Subsystems,
}

#[derive(Debug, Serialize)]
pub struct Subsystems {
    pub database: ComponentStatus,
    pub cache: ComponentStatus,
}

#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub healthy: bool,
    pub latency_ms: u64,
}

#[tracing::instrument(name = "health.check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_start = Instant::now();
    let db_healthy = state.db.health_check().await.is_ok();
    let db_latency_ms = db_start.elapsed().as_millis() as u64;

    let cache_start = Instant::now();
    let cache_healthy = state.cache.exists("__health_check__").await.is_ok();
    let cache_latency_ms = cache_start.elapsed().as_millis() as u64;

    let healthy = db_healthy && cache_healthy;
    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        timestamp: Utc::now(),
        subsystems: Subsystems {
            database: ComponentStatus {
                healthy: db_healthy,
                latency_ms: db_latency_ms,
            },
            cache: ComponentStatus {
                healthy: cache_healthy,
                latency_ms: cache_latency_ms,
            },
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(body))
}
