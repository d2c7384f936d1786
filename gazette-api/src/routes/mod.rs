//! REST API Routes Module
//!
//! Route handlers organised by resource:
//! - Strings analysis registry (`/strings`)
//! - Countries registry and summary image (`/countries`, `/status`)
//! - Health checks and the maintainer profile
//! - Prometheus metrics and the OpenAPI document

pub mod countries;
pub mod health;
pub mod profile;
pub mod status;
pub mod strings;

use std::time::Duration;

use axum::{
    http::{header, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

// Re-export route creation functions for convenience
pub use countries::create_router as countries_router;
pub use health::create_router as health_router;
pub use profile::create_router as profile_router;
pub use status::create_router as status_router;
pub use strings::create_router as strings_router;

// ============================================================================
// OPENAPI ENDPOINTS
// ============================================================================

/// Handler for /openapi.json endpoint.
///
/// With `swagger-ui` enabled the Swagger router serves this path instead.
#[cfg(all(feature = "openapi", not(feature = "swagger-ui")))]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if !config.is_production() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<header::HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// - Strings CRUD and filtering under /strings
/// - Countries CRUD, refresh and image under /countries
/// - Registry status at /status
/// - Health checks at /health and /health/ready
/// - Welcome text at / and profile at /me
/// - Metrics at /metrics
/// - OpenAPI spec at /openapi.json, Swagger UI at /swagger-ui (feature-gated)
pub fn create_api_router(state: AppState, api_config: &ApiConfig) -> Router {
    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest("/strings", strings::create_router(state.strings.clone()))
        .nest(
            "/countries",
            countries::create_router(
                state.countries.clone(),
                state.refresher.clone(),
                state.summary.clone(),
            ),
        )
        .nest("/status", status::create_router(state.countries.clone()))
        .nest(
            "/health",
            health::create_router(state.countries.clone(), state.start_time),
        )
        .merge(profile::create_router(state.profile.clone(), state.facts.clone()))
        .route("/metrics", get(metrics_handler));

    #[cfg(all(feature = "openapi", not(feature = "swagger-ui")))]
    {
        router = router.route("/openapi.json", get(openapi_json));
    }

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/openapi.json", crate::openapi::ApiDoc::openapi()),
        );
    }

    let cors = build_cors_layer(api_config);

    router.layer(from_fn(observability_middleware)).layer(cors)
}
