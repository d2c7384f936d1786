//! Gazette Test Utilities
//!
//! Shared test infrastructure for the gazette workspace:
//! - Proptest generators for strings and predicate sets
//! - Country fixtures
//! - Canned upstream payloads in the shape the real sources return

pub use gazette_core::{CountryRecord, PredicateSet, StringRecord, Timestamp};

use chrono::Utc;
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// FIXTURES
// ============================================================================

/// A fully populated country refreshed "now".
pub fn sample_country(
    name: &str,
    region: &str,
    currency: &str,
    population: u64,
    estimated_gdp: f64,
) -> CountryRecord {
    CountryRecord {
        name: name.to_string(),
        capital: Some(format!("{} City", name)),
        region: Some(region.to_string()),
        population,
        currency_code: Some(currency.to_string()),
        exchange_rate: Some(1.0),
        estimated_gdp,
        flag_url: Some(format!("https://flagcdn.com/{}.svg", name.to_lowercase())),
        last_refreshed_at: Utc::now(),
    }
}

/// Countries payload: one resolvable currency, one unknown currency, one
/// country without currencies at all.
pub fn countries_payload() -> Value {
    json!([
        {
            "name": "Nigeria",
            "capital": "Abuja",
            "region": "Africa",
            "population": 206139587,
            "flag": "https://flagcdn.com/ng.svg",
            "currencies": [{ "code": "NGN", "name": "Nigerian naira", "symbol": "₦" }]
        },
        {
            "name": "Atlantis",
            "region": "Oceania",
            "population": 1000,
            "currencies": [{ "code": "ATL", "name": "Atlantean drachma" }]
        },
        {
            "name": "Antarctica",
            "region": "Polar",
            "population": 1000,
            "flag": "https://flagcdn.com/aq.svg"
        }
    ])
}

/// Exchange rate payload matching [`countries_payload`]; ATL is absent.
pub fn rates_payload() -> Value {
    json!({
        "result": "success",
        "base_code": "USD",
        "rates": { "USD": 1, "NGN": 1600.0, "EUR": 0.92 }
    })
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Short texts with a good share of palindromes, blanks and multi-word input.
pub fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-c]{0,8}",
        "[a-zA-Z ]{0,16}",
        "[a-z]{1,5}( [a-z]{1,5}){0,3}",
        "[a-z]{1,4}".prop_map(|half| {
            let mirrored: String = half.chars().rev().collect();
            format!("{}{}", half, mirrored)
        }),
    ]
}

/// Arbitrary predicate sets, satisfiable or not.
pub fn arb_predicate_set() -> impl Strategy<Value = PredicateSet> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(0i64..12),
        prop::option::of(0i64..20),
        prop::option::of(0usize..5),
        prop::option::of("[a-cA-C]"),
    )
        .prop_map(
            |(is_palindrome, min_length, max_length, word_count, contains_character)| {
                PredicateSet {
                    is_palindrome,
                    min_length,
                    max_length,
                    word_count,
                    contains_character,
                }
            },
        )
}

/// Distinct texts, so every element can be stored without a duplicate error.
pub fn arb_distinct_texts(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(arb_text(), 0..max).prop_map(|set| set.into_iter().collect())
}
