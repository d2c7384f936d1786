//! Error Types for the Gazette API
//!
//! This module defines error handling for the HTTP layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//! - Conversions from domain errors and axum extractor rejections
//!
//! All errors are serialized as JSON `{code, error, details?}` with the
//! status code their `ErrorCode` maps to.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gazette_core::{EntityKind, GazetteError, QueryError, StorageError, UpstreamError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to exactly one HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400, 422)
    // ========================================================================
    /// Request validation failed
    ValidationFailed,

    /// Required field is missing or blank
    MissingField,

    /// Field format is incorrect
    InvalidFormat,

    /// Field has the wrong JSON type
    InvalidType,

    /// Natural-language query could not be interpreted
    QueryUnparseable,

    /// Filters parsed but can never match
    ConflictingFilters,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested string does not exist
    StringNotFound,

    /// Requested country does not exist
    CountryNotFound,

    /// No summary image has been generated yet
    SummaryImageNotFound,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    /// The same string is already stored
    StringAlreadyExists,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// An external data source failed during refresh
    UpstreamUnavailable,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    /// Database connection pool exhausted
    ConnectionPoolExhausted,

    /// Database operation failed
    DatabaseError,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::MissingField
            | ErrorCode::InvalidFormat
            | ErrorCode::QueryUnparseable => StatusCode::BAD_REQUEST,

            ErrorCode::InvalidType | ErrorCode::ConflictingFilters => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            ErrorCode::StringNotFound
            | ErrorCode::CountryNotFound
            | ErrorCode::SummaryImageNotFound => StatusCode::NOT_FOUND,

            ErrorCode::StringAlreadyExists => StatusCode::CONFLICT,

            ErrorCode::UpstreamUnavailable
            | ErrorCode::ServiceUnavailable
            | ErrorCode::ConnectionPoolExhausted => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::InvalidType => "Invalid type",
            ErrorCode::QueryUnparseable => "Unable to parse natural language query",
            ErrorCode::ConflictingFilters => "Query parsed but resulted in conflicting filters",
            ErrorCode::StringNotFound => "String not found",
            ErrorCode::CountryNotFound => "Country not found",
            ErrorCode::SummaryImageNotFound => "Summary image not found",
            ErrorCode::StringAlreadyExists => "String already exists",
            ErrorCode::UpstreamUnavailable => "External data source unavailable",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
            ErrorCode::ConnectionPoolExhausted => "Connection pool exhausted",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured API error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    #[serde(rename = "error")]
    pub message: String,

    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create a ValidationFailed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorCode::MissingField, format!("Missing '{}' field", field))
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Field '{}' has invalid format, expected {}", field, expected),
        )
    }

    /// Create an InvalidType error.
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidType, message)
    }

    pub fn string_not_found() -> Self {
        Self::from_code(ErrorCode::StringNotFound)
    }

    pub fn country_not_found() -> Self {
        Self::from_code(ErrorCode::CountryNotFound)
    }

    pub fn summary_image_not_found() -> Self {
        Self::from_code(ErrorCode::SummaryImageNotFound)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a DatabaseError.
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create a ServiceUnavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Implement IntoResponse for ApiError to enable automatic error handling in Axum.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN AND EXTRACTOR ERRORS
// ============================================================================

impl From<GazetteError> for ApiError {
    fn from(err: GazetteError) -> Self {
        match err {
            GazetteError::Query(QueryError::Unparseable) => {
                ApiError::from_code(ErrorCode::QueryUnparseable)
            }
            GazetteError::Query(QueryError::ConflictingFilters { reason }) => {
                ApiError::from_code(ErrorCode::ConflictingFilters)
                    .with_details(serde_json::Value::String(reason))
            }
            GazetteError::Storage(StorageError::NotFound { entity, .. }) => match entity {
                EntityKind::String => ApiError::string_not_found(),
                EntityKind::Country => ApiError::country_not_found(),
            },
            GazetteError::Storage(StorageError::AlreadyExists { .. }) => {
                ApiError::from_code(ErrorCode::StringAlreadyExists)
            }
            GazetteError::Storage(StorageError::LockPoisoned) => {
                tracing::error!("Registry lock poisoned");
                ApiError::from_code(ErrorCode::InternalError)
            }
            GazetteError::Storage(StorageError::Backend { reason }) => {
                // Log the full error, return a generic one
                tracing::error!(reason = %reason, "Storage backend error");
                ApiError::from_code(ErrorCode::DatabaseError)
            }
            GazetteError::Storage(StorageError::Unavailable { reason }) => {
                tracing::error!(reason = %reason, "Storage unavailable");
                ApiError::from_code(ErrorCode::ConnectionPoolExhausted)
            }
            GazetteError::Upstream(UpstreamError::Unavailable { source_name, reason }) => {
                tracing::warn!(source = %source_name, reason = %reason, "Upstream source failed");
                ApiError::from_code(ErrorCode::UpstreamUnavailable).with_details(
                    serde_json::Value::String(format!("Could not fetch data from {}", source_name)),
                )
            }
        }
    }
}

/// Malformed or non-JSON request bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::InvalidFormat, "Invalid JSON body")
            .with_details(serde_json::Value::String(rejection.body_text()))
    }
}

/// Undecodable query strings.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(ErrorCode::ValidationFailed, "Invalid query parameter values")
            .with_details(serde_json::Value::String(rejection.body_text()))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
