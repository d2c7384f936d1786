//! Predicate sets and the filter engine.
//!
//! A [`PredicateSet`] is an optional combination of conditions joined with
//! logical AND. Absent fields impose no constraint, so the empty set keeps
//! every record.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::string::StringRecord;

/// Structured filter over [`StringRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PredicateSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_palindrome: Option<bool>,
    /// Inclusive lower bound on `length`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    /// Inclusive upper bound on `length`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    /// Exact word count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Case-insensitive substring of `value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_character: Option<String>,
}

impl PredicateSet {
    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.is_palindrome.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.word_count.is_none()
            && self.contains_character.is_none()
    }

    /// Reject sets that parsed fine but can never match a string.
    pub fn validate(&self) -> Result<(), QueryError> {
        if let Some(max) = self.max_length {
            if max < 0 {
                return Err(QueryError::ConflictingFilters {
                    reason: format!("max_length {} is below zero", max),
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(QueryError::ConflictingFilters {
                    reason: format!("min_length {} exceeds max_length {}", min, max),
                });
            }
        }
        Ok(())
    }

    /// Evaluate every present predicate against one record.
    pub fn matches(&self, record: &StringRecord) -> bool {
        let props = &record.properties;
        let length = props.length as i64;

        if let Some(expected) = self.is_palindrome {
            if props.is_palindrome != expected {
                return false;
            }
        }
        if let Some(min) = self.min_length {
            if length < min {
                return false;
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                return false;
            }
        }
        if let Some(count) = self.word_count {
            if props.word_count != count {
                return false;
            }
        }
        if let Some(needle) = &self.contains_character {
            if !record.value.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Stable filter: returns the matching records in their original order.
pub fn apply_filters<'a, I>(records: I, predicates: &PredicateSet) -> Vec<StringRecord>
where
    I: IntoIterator<Item = &'a StringRecord>,
{
    records
        .into_iter()
        .filter(|record| predicates.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(values: &[&str]) -> Vec<StringRecord> {
        values.iter().map(|v| StringRecord::new(*v)).collect()
    }

    fn values(records: &[StringRecord]) -> Vec<&str> {
        records.iter().map(|r| r.value.as_str()).collect()
    }

    #[test]
    fn test_empty_set_returns_everything() {
        let all = records(&["racecar", "hello world", "a"]);
        let filtered = apply_filters(&all, &PredicateSet::default());
        assert_eq!(filtered, all);
    }

    #[test]
    fn test_palindrome_and_length_bounds() {
        let all = records(&["racecar", "noon", "hello", "abcba"]);
        let predicates = PredicateSet {
            is_palindrome: Some(true),
            min_length: Some(5),
            ..Default::default()
        };
        assert_eq!(values(&apply_filters(&all, &predicates)), vec!["racecar", "abcba"]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let all = records(&["abcd", "abcde", "abcdef"]);
        let predicates = PredicateSet {
            min_length: Some(4),
            max_length: Some(5),
            ..Default::default()
        };
        assert_eq!(values(&apply_filters(&all, &predicates)), vec!["abcd", "abcde"]);
    }

    #[test]
    fn test_word_count_exact() {
        let all = records(&["one", "two words", "three little words"]);
        let predicates = PredicateSet {
            word_count: Some(2),
            ..Default::default()
        };
        assert_eq!(values(&apply_filters(&all, &predicates)), vec!["two words"]);
    }

    #[test]
    fn test_contains_character_is_case_insensitive() {
        let all = records(&["Zebra", "apple", "fizz"]);
        let predicates = PredicateSet {
            contains_character: Some("Z".to_string()),
            ..Default::default()
        };
        assert_eq!(values(&apply_filters(&all, &predicates)), vec!["Zebra", "fizz"]);
    }

    #[test]
    fn test_filter_preserves_order() {
        let all = records(&["bb", "a", "cc", "d"]);
        let predicates = PredicateSet {
            max_length: Some(1),
            ..Default::default()
        };
        assert_eq!(values(&apply_filters(&all, &predicates)), vec!["a", "d"]);
    }

    #[test]
    fn test_validate_conflicts() {
        let conflicting = PredicateSet {
            min_length: Some(10),
            max_length: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            conflicting.validate(),
            Err(QueryError::ConflictingFilters { .. })
        ));

        let negative = PredicateSet {
            max_length: Some(-1),
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let fine = PredicateSet {
            min_length: Some(3),
            max_length: Some(3),
            ..Default::default()
        };
        assert!(fine.validate().is_ok());
    }

    #[test]
    fn test_serialization_omits_absent_fields() -> Result<(), serde_json::Error> {
        let predicates = PredicateSet {
            is_palindrome: Some(true),
            min_length: Some(6),
            ..Default::default()
        };
        let json = serde_json::to_value(&predicates)?;
        assert_eq!(json, serde_json::json!({"is_palindrome": true, "min_length": 6}));
        Ok(())
    }
}
