//! String analysis.
//!
//! [`analyze`] is a pure function of its input: the same text always yields
//! the same properties and the same content hash.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::string::StringProperties;

/// SHA-256 of the exact UTF-8 bytes of `value`, as lowercase hex.
pub fn content_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the structural properties of `value`.
pub fn analyze(value: &str) -> StringProperties {
    let lower = value.to_lowercase();
    let is_palindrome = lower.chars().eq(lower.chars().rev());

    let mut character_frequency = BTreeMap::new();
    for ch in value.chars() {
        *character_frequency.entry(ch).or_insert(0) += 1;
    }

    StringProperties {
        length: value.chars().count(),
        is_palindrome,
        unique_characters: character_frequency.len(),
        // split_whitespace skips leading/trailing runs, so blank input is 0
        word_count: value.split_whitespace().count(),
        content_hash: content_hash(value),
        character_frequency,
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_analyze_is_deterministic(text in ".*") {
            prop_assert_eq!(analyze(&text), analyze(&text));
        }

        #[test]
        fn prop_hash_differs_for_different_text(a in ".*", b in ".*") {
            prop_assume!(a != b);
            prop_assert_ne!(content_hash(&a), content_hash(&b));
        }

        #[test]
        fn prop_frequency_sums_to_length(text in ".*") {
            let props = analyze(&text);
            prop_assert_eq!(props.character_frequency.values().sum::<usize>(), props.length);
            prop_assert!(props.unique_characters <= props.length);
        }
    }
}
