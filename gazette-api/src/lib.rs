//! Gazette API - REST Layer
//!
//! Axum service over the two gazette registries: the in-memory strings
//! registry and the PostgreSQL-backed countries registry, refreshed on demand
//! from the upstream country and exchange-rate sources.

pub mod config;
pub mod db;
pub mod error;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod services;
pub mod sources;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, ProfileConfig, SourcesConfig, SummaryConfig};
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::{
    FixedMultiplier, MultiplierSource, RandomMultiplier, RefreshOrchestrator, RefreshOutcome,
    SummaryImage,
};
pub use sources::{CountrySource, FactSource, HttpSources, RateSource};
pub use state::{AppState, Upstream};
pub use types::*;
