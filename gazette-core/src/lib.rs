//! Gazette Core - Domain Types and Pure Logic
//!
//! Everything here is synchronous and free of I/O: string analysis, the
//! predicate filter engine, the natural-language query parser, and the
//! country record types shared by the storage and API crates.

use chrono::{DateTime, Utc};

pub mod analyzer;
pub mod country;
pub mod error;
pub mod filter;
pub mod nlq;
pub mod string;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub use analyzer::{analyze, content_hash};
pub use country::{
    estimate_gdp, resolve_exchange_rate, CountryFilter, CountryRecord, CountrySort, CountryStatus,
    GDP_MULTIPLIER_RANGE,
};
pub use error::{EntityKind, GazetteError, GazetteResult, QueryError, StorageError, UpstreamError};
pub use filter::{apply_filters, PredicateSet};
pub use nlq::parse_natural_query;
pub use string::{StringProperties, StringRecord};
