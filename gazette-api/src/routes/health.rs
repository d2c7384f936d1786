//! Health Check Endpoints
//!
//! - /health - Liveness with the current server time
//! - /health/ready - Country store reachability

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use gazette_storage::CountryStore;
use std::sync::Arc;
use std::time::Instant;

use crate::types::{HealthResponse, ReadinessResponse};

const DATABASE_HEALTHY: &str = "healthy";
const DATABASE_UNHEALTHY: &str = "unhealthy";

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct HealthState {
    pub store: Arc<dyn CountryStore>,
    pub start_time: Instant,
}

impl HealthState {
    pub fn new(store: Arc<dyn CountryStore>, start_time: Instant) -> Self {
        Self { store, start_time }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health - Process liveness check
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
))]
pub async fn liveness() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

/// GET /health/ready - Readiness check (store connectivity)
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse),
    ),
))]
pub async fn readiness(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let start = Instant::now();

    let (status_code, status, database, latency_ms) = match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            "ready",
            DATABASE_HEALTHY,
            Some(start.elapsed().as_millis() as u64),
        ),
        Err(e) => {
            // Details stay in the log; the body only says the store is down
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                DATABASE_UNHEALTHY,
                None,
            )
        }
    };

    let response = ReadinessResponse {
        status: status.to_string(),
        database: database.to_string(),
        latency_ms,
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create health check router
pub fn create_router(store: Arc<dyn CountryStore>, start_time: Instant) -> Router {
    let state = Arc::new(HealthState::new(store, start_time));

    Router::new()
        .route("/", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}
