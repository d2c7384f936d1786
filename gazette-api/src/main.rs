//! Gazette API Server Entry Point
//!
//! Reads configuration from the environment, prepares the countries table and
//! starts the Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use gazette_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, DbClient, DbConfig,
    HttpSources, ProfileConfig, RandomMultiplier, SourcesConfig, SummaryConfig, Upstream,
};
use gazette_api::telemetry::{init_tracing, TelemetryConfig};
use gazette_storage::CountryStore;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::from_env();
    init_tracing(&telemetry_config)?;

    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config)?;
    db.ensure_schema().await?;

    let sources = Arc::new(HttpSources::new(SourcesConfig::from_env())?);
    let upstream = Upstream {
        countries: sources.clone(),
        rates: sources.clone(),
        facts: sources,
    };

    let api_config = ApiConfig::from_env();
    let state = AppState::new(
        Arc::new(db),
        upstream,
        Arc::new(RandomMultiplier::from_os_rng()),
        &SummaryConfig::from_env(),
        ProfileConfig::from_env(),
    );

    let app: Router = create_api_router(state, &api_config);

    let addr = api_config.socket_addr();
    tracing::info!(
        %addr,
        service = %telemetry_config.service_name,
        environment = %telemetry_config.environment,
        "Starting Gazette API server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
