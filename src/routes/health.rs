use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub demo_mode: bool,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub database: String,
    pub redis: String,
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let (db_result, redis_result) =
        tokio::join!(db::health_check(&state.db), state.cache.health_check());

    let db_status = if db_result { "ok" } else { "error" };
    let redis_status = if redis_result.is_ok() { "ok" } else { "error" };

    // Cache misses fall through to Postgres, so only the database is critical
    let status = match (db_result, redis_result.is_ok()) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    let status_code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            demo_mode: state.demo.is_some(),
            services: ServiceHealth {
                database: db_status.to_string(),
                redis: redis_status.to_string(),
            },
        }),
    )
}
