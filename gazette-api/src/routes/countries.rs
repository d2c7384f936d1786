//! Countries REST API Routes
//!
//! Refresh from the upstream sources, list with filters, fetch or delete by
//! name, and serve the cached summary image.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use gazette_core::{CountryFilter, CountrySort};
use gazette_storage::CountryStore;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    services::{RefreshOrchestrator, SummaryImage},
    types::RefreshResponse,
};

#[cfg(feature = "openapi")]
use gazette_core::CountryRecord;

// ============================================================================
// SHARED STATE
// ============================================================================

#[derive(Clone)]
pub struct CountriesState {
    pub store: Arc<dyn CountryStore>,
    pub refresher: Arc<RefreshOrchestrator>,
    pub summary: SummaryImage,
}

impl CountriesState {
    pub fn new(
        store: Arc<dyn CountryStore>,
        refresher: Arc<RefreshOrchestrator>,
        summary: SummaryImage,
    ) -> Self {
        Self {
            store,
            refresher,
            summary,
        }
    }
}

// ============================================================================
// QUERY PARSING
// ============================================================================

/// Query parameters for `GET /countries`.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListCountriesParams {
    /// Region, case-insensitive
    pub region: Option<String>,
    /// Currency code, case-insensitive
    pub currency: Option<String>,
    /// Only `gdp_desc` is supported
    pub sort: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ListCountriesParams {
    pub fn into_filter(self) -> ApiResult<(CountryFilter, Option<CountrySort>)> {
        let sort = match blank_to_none(self.sort) {
            None => None,
            Some(raw) => Some(
                raw.parse::<CountrySort>()
                    .map_err(|_| ApiError::invalid_format("sort", "gdp_desc"))?,
            ),
        };
        let filter = CountryFilter {
            region: blank_to_none(self.region),
            currency: blank_to_none(self.currency),
        };
        Ok((filter, sort))
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /countries/refresh - Pull fresh data from the upstream sources
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/countries/refresh",
    tag = "Countries",
    responses(
        (status = 200, description = "Registry refreshed", body = RefreshResponse),
        (status = 503, description = "External data source unavailable", body = ApiError),
    ),
))]
pub async fn refresh_countries(
    State(state): State<Arc<CountriesState>>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state.refresher.refresh().await?;

    Ok(Json(RefreshResponse {
        status: "success".to_string(),
        refreshed_at: outcome.refreshed_at,
    }))
}

/// GET /countries - List countries
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/countries",
    tag = "Countries",
    params(ListCountriesParams),
    responses(
        (status = 200, description = "Matching countries", body = Vec<CountryRecord>),
        (status = 400, description = "Invalid query parameter values", body = ApiError),
    ),
))]
pub async fn list_countries(
    State(state): State<Arc<CountriesState>>,
    params: Result<Query<ListCountriesParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let (filter, sort) = params.into_filter()?;

    let countries = state.store.list(&filter, sort).await?;
    Ok(Json(countries))
}

/// GET /countries/image - Serve the latest summary image
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/countries/image",
    tag = "Countries",
    responses(
        (status = 200, description = "Summary PNG", content_type = "image/png"),
        (status = 404, description = "Summary image not found", body = ApiError),
    ),
))]
pub async fn get_summary_image(
    State(state): State<Arc<CountriesState>>,
) -> ApiResult<impl IntoResponse> {
    let bytes = state
        .summary
        .read()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, path = %state.summary.path().display(), "Failed to read summary image");
            ApiError::internal_error("Failed to read summary image")
        })?
        .ok_or_else(ApiError::summary_image_not_found)?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

/// GET /countries/{name} - Fetch a country by name
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/countries/{name}",
    tag = "Countries",
    params(
        ("name" = String, Path, description = "Country name, case-insensitive")
    ),
    responses(
        (status = 200, description = "Country details", body = CountryRecord),
        (status = 404, description = "Country not found", body = ApiError),
    ),
))]
pub async fn get_country(
    State(state): State<Arc<CountriesState>>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let country = state
        .store
        .get_by_name(&name)
        .await?
        .ok_or_else(|| not_found(&name))?;

    Ok(Json(country))
}

/// DELETE /countries/{name} - Delete a country by name
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/countries/{name}",
    tag = "Countries",
    params(
        ("name" = String, Path, description = "Country name, case-insensitive")
    ),
    responses(
        (status = 204, description = "Country deleted"),
        (status = 404, description = "Country not found", body = ApiError),
    ),
))]
pub async fn delete_country(
    State(state): State<Arc<CountriesState>>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_by_name(&name).await? {
        return Err(not_found(&name));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(name: &str) -> ApiError {
    tracing::debug!(name = %name, "Country not found");
    ApiError::country_not_found()
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router(
    store: Arc<dyn CountryStore>,
    refresher: Arc<RefreshOrchestrator>,
    summary: SummaryImage,
) -> axum::Router {
    let state = Arc::new(CountriesState::new(store, refresher, summary));

    axum::Router::new()
        .route("/", axum::routing::get(list_countries))
        .route("/refresh", axum::routing::post(refresh_countries))
        .route("/image", axum::routing::get(get_summary_image))
        .route("/:name", axum::routing::get(get_country))
        .route("/:name", axum::routing::delete(delete_country))
        .with_state(state)
}
