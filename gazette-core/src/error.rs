//! Error types for gazette operations

use thiserror::Error;

/// Kind of record a storage error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    String,
    Country,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::String => write!(f, "String"),
            EntityKind::Country => write!(f, "Country"),
        }
    }
}

/// Natural-language and structured query errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// No rule produced a predicate.
    #[error("Unable to parse natural language query")]
    Unparseable,

    /// The predicate set parsed but can never match anything.
    #[error("Query parsed but resulted in conflicting filters: {reason}")]
    ConflictingFilters { reason: String },
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityKind, key: String },

    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: EntityKind, key: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Storage backend failed: {reason}")]
    Backend { reason: String },

    /// The backend cannot be reached right now (pool exhausted or closed).
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Failures talking to the external data sources used by a refresh.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Could not fetch data from {source_name}: {reason}")]
    Unavailable { source_name: String, reason: String },
}

impl UpstreamError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        UpstreamError::Unavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Master error type for all gazette errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GazetteError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Result type alias for gazette operations.
pub type GazetteResult<T> = Result<T, GazetteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_not_found() {
        let err = StorageError::NotFound {
            entity: EntityKind::Country,
            key: "Ghana".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Country not found"));
        assert!(msg.contains("Ghana"));
    }

    #[test]
    fn test_query_error_display() {
        assert_eq!(
            QueryError::Unparseable.to_string(),
            "Unable to parse natural language query"
        );
        let err = QueryError::ConflictingFilters {
            reason: "min_length 9 exceeds max_length 2".to_string(),
        };
        assert!(err.to_string().contains("conflicting filters"));
        assert!(err.to_string().contains("min_length 9"));
    }

    #[test]
    fn test_upstream_error_display() {
        let err = UpstreamError::unavailable("Exchange Rates", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("Exchange Rates"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_gazette_error_from_variants() {
        let query = GazetteError::from(QueryError::Unparseable);
        assert!(matches!(query, GazetteError::Query(_)));

        let storage = GazetteError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, GazetteError::Storage(_)));

        let upstream = GazetteError::from(UpstreamError::unavailable("Countries", "timeout"));
        assert!(matches!(upstream, GazetteError::Upstream(_)));
    }
}
