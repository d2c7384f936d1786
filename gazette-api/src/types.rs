//! Request and response bodies that are not domain records.

use gazette_core::{PredicateSet, StringRecord, Timestamp};
use serde::{Deserialize, Serialize};

use crate::config::ProfileConfig;

// ============================================================================
// STRINGS
// ============================================================================

/// Body of `POST /strings`. Documentation only: the handler inspects the raw
/// JSON so it can tell a missing value from a non-string one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateStringRequest {
    pub value: String,
}

/// `GET /strings` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StringListResponse {
    pub data: Vec<StringRecord>,
    pub count: usize,
    pub filters_applied: PredicateSet,
}

/// How a natural-language query was understood.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InterpretedQuery {
    pub original: String,
    pub parsed_filters: PredicateSet,
}

/// `GET /strings/filter-by-natural-language` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NaturalQueryResponse {
    pub data: Vec<StringRecord>,
    pub count: usize,
    pub interpreted_query: InterpretedQuery,
}

// ============================================================================
// COUNTRIES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RefreshResponse {
    pub status: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub refreshed_at: Timestamp,
}

// ============================================================================
// SERVICE
// ============================================================================

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub timestamp: Timestamp,
}

/// `GET /health/ready`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    pub uptime_seconds: u64,
    pub version: String,
}

/// `GET /me`
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProfileResponse {
    pub status: String,
    pub user: ProfileConfig,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub timestamp: Timestamp,
    pub fact: String,
}
