//! Analyzed string records.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analyzer::analyze;
use crate::Timestamp;

/// Structural properties derived from a string value.
///
/// Computed once by [`analyze`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StringProperties {
    /// Number of characters (Unicode scalar values)
    pub length: usize,
    /// Case-insensitive palindrome check, whitespace and punctuation included
    pub is_palindrome: bool,
    /// Number of distinct characters in the original value
    pub unique_characters: usize,
    /// Number of whitespace-delimited tokens
    pub word_count: usize,
    /// SHA-256 of the exact input bytes, lowercase hex
    #[serde(rename = "sha256_hash")]
    pub content_hash: String,
    /// Occurrence count per character
    #[serde(rename = "character_frequency_map")]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub character_frequency: BTreeMap<char, usize>,
}

/// A stored string keyed by its content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StringRecord {
    /// Content hash, doubles as the primary key
    pub id: String,
    /// The original text
    pub value: String,
    pub properties: StringProperties,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
}

impl StringRecord {
    /// Analyze `value` and stamp the record with the given creation time.
    pub fn with_created_at(value: impl Into<String>, created_at: Timestamp) -> Self {
        let value = value.into();
        let properties = analyze(&value);
        Self {
            id: properties.content_hash.clone(),
            value,
            properties,
            created_at,
        }
    }

    /// Analyze `value` and stamp the record with the current time.
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_created_at(value, Utc::now())
    }
}
