//! # Health Check Handlers
//!
//! Liveness and readiness endpoints for monitoring and load balancing.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error};

use crate::web::errors::ApiError;
use crate::web::state::AppState;

/// Basic health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
}

/// Readiness response including the store check
#[derive(Serialize)]
pub struct ReadinessResponse {
    status: String,
    timestamp: String,
    environment: String,
    store_backend: String,
    store_check_ms: u64,
}

/// Basic health check endpoint: GET /health
///
/// Returns OK whenever the process is serving requests.
pub async fn basic_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Readiness probe: GET /ready
///
/// Ready only when the entity store answers its health check.
pub async fn readiness_probe(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, ApiError> {
    debug!("Performing readiness probe");

    let store = state.catalog.store();
    let start_time = Instant::now();

    if let Err(e) = store.health_check().await {
        error!(backend = store.backend_name(), error = %e, "Store health check failed");
        return Err(ApiError::ServiceUnavailable);
    }

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: state.environment.to_string(),
        store_backend: store.backend_name().to_string(),
        store_check_ms: start_time.elapsed().as_millis() as u64,
    }))
}
