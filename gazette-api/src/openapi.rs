//! OpenAPI Specification for the Gazette API
//!
//! Generated by utoipa from the route annotations and the schema derives on
//! the domain and response types.

use utoipa::OpenApi;

use crate::config::ProfileConfig;
use crate::error::{ApiError, ErrorCode};
use crate::routes::{countries, health, profile, status, strings};
use crate::telemetry::metrics;
use crate::types::*;

use gazette_core::{CountryRecord, CountryStatus, PredicateSet, StringProperties, StringRecord};

/// OpenAPI document for the Gazette API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gazette API",
        version = "0.2.0",
        description = "Countries registry with synthetic GDP estimates and a string analysis registry with natural-language filtering",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development"),
    ),
    tags(
        (name = "Strings", description = "String analysis, structured and natural-language filtering"),
        (name = "Countries", description = "Country registry, refresh and summary image"),
        (name = "Health", description = "Liveness and readiness checks"),
        (name = "Profile", description = "Landing page and maintainer profile"),
        (name = "Observability", description = "Prometheus metrics"),
    ),
    paths(
        strings::create_string,
        strings::list_strings,
        strings::filter_by_natural_language,
        strings::get_string,
        strings::delete_string,
        countries::refresh_countries,
        countries::list_countries,
        countries::get_summary_image,
        countries::get_country,
        countries::delete_country,
        status::get_status,
        health::liveness,
        health::readiness,
        profile::welcome,
        profile::get_profile,
        metrics::metrics_handler,
    ),
    components(
        schemas(
            ApiError,
            ErrorCode,
            StringRecord,
            StringProperties,
            PredicateSet,
            CountryRecord,
            CountryStatus,
            ProfileConfig,
            CreateStringRequest,
            StringListResponse,
            InterpretedQuery,
            NaturalQueryResponse,
            RefreshResponse,
            HealthResponse,
            ReadinessResponse,
            ProfileResponse,
        )
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Serialize the document as pretty JSON.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() -> Result<(), String> {
        let openapi = ApiDoc::openapi();
        assert_eq!(openapi.info.title, "Gazette API");

        let tags = openapi
            .tags
            .as_ref()
            .ok_or_else(|| "OpenAPI tags missing".to_string())?;
        assert_eq!(tags.len(), 5);

        let components = openapi
            .components
            .as_ref()
            .ok_or_else(|| "OpenAPI components missing".to_string())?;
        assert!(components.schemas.contains_key("StringRecord"));
        assert!(components.schemas.contains_key("CountryRecord"));
        Ok(())
    }

    #[test]
    fn test_openapi_json_serialization() -> Result<(), String> {
        let json = ApiDoc::to_json().map_err(|e| format!("Failed to serialize OpenAPI: {}", e))?;
        serde_json::from_str::<serde_json::Value>(&json)
            .map_err(|e| format!("Generated JSON invalid: {}", e))?;
        assert!(json.contains("Gazette API"));
        Ok(())
    }

    #[test]
    fn test_openapi_paths_exist() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for path in [
            "/strings",
            "/strings/filter-by-natural-language",
            "/strings/{value}",
            "/countries",
            "/countries/refresh",
            "/countries/image",
            "/countries/{name}",
            "/status",
            "/health",
            "/health/ready",
            "/me",
            "/metrics",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }
}
