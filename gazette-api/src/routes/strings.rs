//! String Analysis REST API Routes
//!
//! Create, fetch, list, filter and delete analyzed strings. Records are
//! addressed by their raw value; the registry recomputes the content hash.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use gazette_core::{GazetteError, PredicateSet};
use gazette_storage::StringsRegistry;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult, ErrorCode},
    telemetry::metrics::with_metrics,
    types::{InterpretedQuery, NaturalQueryResponse, StringListResponse},
};

#[cfg(feature = "openapi")]
use crate::types::CreateStringRequest;
#[cfg(feature = "openapi")]
use gazette_core::StringRecord;

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for string routes.
#[derive(Clone)]
pub struct StringsState {
    pub registry: Arc<StringsRegistry>,
}

impl StringsState {
    pub fn new(registry: Arc<StringsRegistry>) -> Self {
        Self { registry }
    }

    fn publish_size(&self) {
        if let Ok(count) = self.registry.len() {
            with_metrics(|metrics| metrics.set_strings_stored(count));
        }
    }
}

// ============================================================================
// QUERY PARSING
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NaturalQueryParams {
    pub query: Option<String>,
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_count<T: std::str::FromStr>(params: &HashMap<String, String>, key: &str) -> ApiResult<Option<T>> {
    match non_empty(params, key) {
        None => Ok(None),
        // Signs are rejected up front so "-1" and "+1" fail the same way
        Some(raw) if raw.bytes().all(|b| b.is_ascii_digit()) => raw
            .parse()
            .map(Some)
            .map_err(|_| ApiError::invalid_format(key, "a non-negative integer")),
        Some(_) => Err(ApiError::invalid_format(key, "a non-negative integer")),
    }
}

/// Build a [`PredicateSet`] from `GET /strings` query parameters.
///
/// Blank parameters count as absent and unknown parameters are ignored.
pub fn parse_structured_filters(params: &HashMap<String, String>) -> ApiResult<PredicateSet> {
    let is_palindrome = match non_empty(params, "is_palindrome") {
        None => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(_) => return Err(ApiError::invalid_format("is_palindrome", "true or false")),
    };

    // Any non-blank needle, matched as a case-insensitive substring
    let contains_character = params
        .get("contains_character")
        .filter(|raw| !raw.trim().is_empty())
        .cloned();

    Ok(PredicateSet {
        is_palindrome,
        min_length: parse_count(params, "min_length")?,
        max_length: parse_count(params, "max_length")?,
        word_count: parse_count(params, "word_count")?,
        contains_character,
    })
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /strings - Analyze and store a string
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/strings",
    tag = "Strings",
    request_body = CreateStringRequest,
    responses(
        (status = 201, description = "String analyzed and stored", body = StringRecord),
        (status = 400, description = "Missing or blank value", body = ApiError),
        (status = 409, description = "String already exists", body = ApiError),
        (status = 422, description = "Value is not a string", body = ApiError),
    ),
))]
pub async fn create_string(
    State(state): State<Arc<StringsState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;

    let value = match body.get("value") {
        None | Some(Value::Null) => return Err(ApiError::missing_field("value")),
        Some(Value::String(value)) => value,
        Some(_) => return Err(ApiError::invalid_type("Value must be a string")),
    };
    if value.trim().is_empty() {
        return Err(ApiError::missing_field("value"));
    }

    let record = state.registry.create(value)?;
    state.publish_size();

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /strings - List strings matching structured filters
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/strings",
    tag = "Strings",
    params(
        ("is_palindrome" = Option<bool>, Query, description = "true or false"),
        ("min_length" = Option<u64>, Query, description = "Minimum length in characters"),
        ("max_length" = Option<u64>, Query, description = "Maximum length in characters"),
        ("word_count" = Option<u64>, Query, description = "Exact number of words"),
        ("contains_character" = Option<String>, Query, description = "Character or substring, case-insensitive"),
    ),
    responses(
        (status = 200, description = "Matching strings", body = StringListResponse),
        (status = 400, description = "Invalid query parameter values", body = ApiError),
        (status = 422, description = "Filters can never match", body = ApiError),
    ),
))]
pub async fn list_strings(
    State(state): State<Arc<StringsState>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let filters = parse_structured_filters(&params)?;
    filters.validate().map_err(GazetteError::from)?;

    let data = state.registry.list(&filters)?;
    Ok(Json(StringListResponse {
        count: data.len(),
        data,
        filters_applied: filters,
    }))
}

/// GET /strings/filter-by-natural-language - Filter with a plain-English query
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/strings/filter-by-natural-language",
    tag = "Strings",
    params(
        ("query" = String, Query, description = "e.g. \"single word palindromic strings\""),
    ),
    responses(
        (status = 200, description = "Matching strings with the interpretation", body = NaturalQueryResponse),
        (status = 400, description = "Missing or unparseable query", body = ApiError),
        (status = 422, description = "Query parsed but resulted in conflicting filters", body = ApiError),
    ),
))]
pub async fn filter_by_natural_language(
    State(state): State<Arc<StringsState>>,
    params: Result<Query<NaturalQueryParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let query = params
        .query
        .filter(|query| !query.trim().is_empty())
        .ok_or_else(|| ApiError::new(ErrorCode::MissingField, "Missing 'query' parameter"))?;

    let (parsed_filters, data) = state.registry.query_natural(&query)?;
    tracing::debug!(query = %query, filters = ?parsed_filters, matches = data.len(), "Natural query");

    Ok(Json(NaturalQueryResponse {
        count: data.len(),
        data,
        interpreted_query: InterpretedQuery {
            original: query,
            parsed_filters,
        },
    }))
}

/// GET /strings/{value} - Fetch a string by its raw value
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/strings/{value}",
    tag = "Strings",
    params(
        ("value" = String, Path, description = "The exact stored text")
    ),
    responses(
        (status = 200, description = "String record", body = StringRecord),
        (status = 404, description = "String not found", body = ApiError),
    ),
))]
pub async fn get_string(
    State(state): State<Arc<StringsState>>,
    Path(value): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let record = state.registry.get(&value)?;
    Ok(Json(record))
}

/// DELETE /strings/{value} - Delete a string by its raw value
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/strings/{value}",
    tag = "Strings",
    params(
        ("value" = String, Path, description = "The exact stored text")
    ),
    responses(
        (status = 204, description = "String deleted"),
        (status = 404, description = "String not found", body = ApiError),
    ),
))]
pub async fn delete_string(
    State(state): State<Arc<StringsState>>,
    Path(value): Path<String>,
) -> ApiResult<StatusCode> {
    state.registry.delete(&value)?;
    state.publish_size();
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router(registry: Arc<StringsRegistry>) -> axum::Router {
    let state = Arc::new(StringsState::new(registry));

    axum::Router::new()
        .route("/", axum::routing::post(create_string))
        .route("/", axum::routing::get(list_strings))
        .route(
            "/filter-by-natural-language",
            axum::routing::get(filter_by_natural_language),
        )
        .route("/:value", axum::routing::get(get_string))
        .route("/:value", axum::routing::delete(delete_string))
        .with_state(state)
}
