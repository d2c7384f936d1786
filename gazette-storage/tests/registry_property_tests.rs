//! Property-Based Tests for the Strings Registry
//!
//! For any set of distinct texts and any predicate set:
//! - listing with no predicates returns every record in insertion order
//! - listing with predicates returns exactly the stored records that match
//! - a second create of the same text is rejected until the text is deleted

use gazette_core::{GazetteError, PredicateSet, StorageError, StringRecord};
use gazette_storage::StringsRegistry;
use gazette_test_utils::{arb_distinct_texts, arb_predicate_set, arb_text};
use proptest::prelude::*;

fn registry_with(texts: &[String]) -> StringsRegistry {
    let registry = StringsRegistry::new();
    for text in texts {
        registry.create(text).expect("distinct texts must store");
    }
    registry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_unfiltered_list_keeps_insertion_order(texts in arb_distinct_texts(12)) {
        let registry = registry_with(&texts);

        let listed: Vec<String> = registry
            .list(&PredicateSet::default())
            .expect("list")
            .into_iter()
            .map(|record| record.value)
            .collect();
        prop_assert_eq!(listed, texts.clone());
        prop_assert_eq!(registry.len().expect("len"), texts.len());
    }

    #[test]
    fn prop_filtered_list_matches_predicates(
        texts in arb_distinct_texts(12),
        predicates in arb_predicate_set(),
    ) {
        let registry = registry_with(&texts);

        let listed: Vec<String> = registry
            .list(&predicates)
            .expect("list")
            .into_iter()
            .map(|record| record.value)
            .collect();
        let expected: Vec<String> = texts
            .iter()
            .filter(|text| predicates.matches(&StringRecord::new(text.as_str())))
            .cloned()
            .collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn prop_duplicate_rejected_until_deleted(text in arb_text()) {
        let registry = StringsRegistry::new();
        let first = registry.create(&text).expect("first create");

        let duplicate = registry.create(&text);
        let is_already_exists = matches!(
            duplicate,
            Err(GazetteError::Storage(StorageError::AlreadyExists { .. }))
        );
        prop_assert!(is_already_exists);
        prop_assert_eq!(registry.get(&text).expect("get"), first);

        registry.delete(&text).expect("delete");
        let gone = matches!(
            registry.get(&text),
            Err(GazetteError::Storage(StorageError::NotFound { .. }))
        );
        prop_assert!(gone);
        prop_assert!(registry.create(&text).is_ok());
    }
}
