//! Natural-language query parsing.
//!
//! Rules run in a fixed order over the lower-cased query and later rules
//! overwrite earlier ones:
//!
//! | pattern                               | effect                      |
//! |---------------------------------------|-----------------------------|
//! | `palindrome`                          | `is_palindrome = true`      |
//! | `non-palindrome`                      | `is_palindrome = false`     |
//! | `single word`                         | `word_count = 1`            |
//! | `<N> word`                            | `word_count = N`            |
//! | `longer than <N>`                     | `min_length = N + 1`        |
//! | `shorter than <N>`                    | `max_length = N - 1`        |
//! | `contain[ing] the letter X` / `contain[ing] X` | `contains_character = X` |
//!
//! Parsing never checks whether the result is satisfiable; that is
//! [`PredicateSet::validate`]'s job.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::QueryError;
use crate::filter::PredicateSet;

static WORD_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s+word").expect("Invalid word count regex"));
static LONGER_THAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"longer than ([0-9]+)").expect("Invalid longer-than regex"));
static SHORTER_THAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"shorter than ([0-9]+)").expect("Invalid shorter-than regex"));
static CONTAINS_LETTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"contain(?:ing)? the letter ([a-z0-9_])").expect("Invalid contains-letter regex")
});
static CONTAINS_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"contain(?:ing)? ([a-z0-9_])").expect("Invalid contains regex"));

/// First capture group of `re` in `text`, parsed as an integer.
///
/// Numbers that overflow are treated as absent.
fn capture_number<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract a predicate set from free-form text.
///
/// Fails with [`QueryError::Unparseable`] when no rule fires.
pub fn parse_natural_query(query: &str) -> Result<PredicateSet, QueryError> {
    let text = query.to_lowercase();
    let mut filters = PredicateSet::default();

    if text.contains("palindrome") {
        filters.is_palindrome = Some(true);
    }
    if text.contains("non-palindrome") {
        filters.is_palindrome = Some(false);
    }

    if text.contains("single word") {
        filters.word_count = Some(1);
    }
    if let Some(count) = capture_number::<usize>(&WORD_COUNT, &text) {
        filters.word_count = Some(count);
    }

    if text.contains("longer than") {
        if let Some(n) = capture_number::<i64>(&LONGER_THAN, &text).and_then(|n| n.checked_add(1)) {
            filters.min_length = Some(n);
        }
    }
    if text.contains("shorter than") {
        if let Some(n) = capture_number::<i64>(&SHORTER_THAN, &text).and_then(|n| n.checked_sub(1)) {
            filters.max_length = Some(n);
        }
    }

    if text.contains("contain") {
        let captured = CONTAINS_LETTER
            .captures(&text)
            .or_else(|| CONTAINS_BARE.captures(&text))
            .and_then(|caps| caps.get(1));
        if let Some(m) = captured {
            filters.contains_character = Some(m.as_str().to_string());
        }
    }

    if filters.is_empty() {
        return Err(QueryError::Unparseable);
    }
    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palindromes_longer_than() {
        let filters = parse_natural_query("palindromes longer than 5").unwrap();
        assert_eq!(
            filters,
            PredicateSet {
                is_palindrome: Some(true),
                min_length: Some(6),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_gibberish_fails() {
        assert_eq!(parse_natural_query("gibberish xyz"), Err(QueryError::Unparseable));
        assert_eq!(parse_natural_query(""), Err(QueryError::Unparseable));
    }

    #[test]
    fn test_single_word_palindromic_strings() {
        let filters = parse_natural_query("all single word palindromic strings").unwrap();
        // "palindromic" does not contain "palindrome"
        assert_eq!(filters.is_palindrome, None);
        assert_eq!(filters.word_count, Some(1));
    }

    #[test]
    fn test_non_palindrome_wins() {
        let filters = parse_natural_query("non-palindrome strings").unwrap();
        assert_eq!(filters.is_palindrome, Some(false));
    }

    #[test]
    fn test_explicit_count_beats_single_word() {
        let filters = parse_natural_query("single word or 3 words").unwrap();
        assert_eq!(filters.word_count, Some(3));
    }

    #[test]
    fn test_word_count_singular_and_plural() {
        assert_eq!(parse_natural_query("2 words").unwrap().word_count, Some(2));
        assert_eq!(parse_natural_query("1 word").unwrap().word_count, Some(1));
    }

    #[test]
    fn test_shorter_than() {
        let filters = parse_natural_query("strings shorter than 10 characters").unwrap();
        assert_eq!(filters.max_length, Some(9));
    }

    #[test]
    fn test_shorter_than_zero_parses_but_conflicts() {
        let filters = parse_natural_query("shorter than 0").unwrap();
        assert_eq!(filters.max_length, Some(-1));
        assert!(filters.validate().is_err());
    }

    #[test]
    fn test_longer_and_shorter_conflict_is_not_a_parse_error() {
        let filters = parse_natural_query("longer than 10 and shorter than 3").unwrap();
        assert_eq!(filters.min_length, Some(11));
        assert_eq!(filters.max_length, Some(2));
        assert!(matches!(
            filters.validate(),
            Err(QueryError::ConflictingFilters { .. })
        ));
    }

    #[test]
    fn test_longer_than_without_number_is_ignored() {
        assert_eq!(parse_natural_query("longer than usual"), Err(QueryError::Unparseable));
    }

    #[test]
    fn test_contains_the_letter() {
        let filters = parse_natural_query("strings containing the letter Z").unwrap();
        assert_eq!(filters.contains_character.as_deref(), Some("z"));
    }

    #[test]
    fn test_contains_bare_token_takes_first_character() {
        let filters = parse_natural_query("words that contain apple").unwrap();
        assert_eq!(filters.contains_character.as_deref(), Some("a"));
    }

    #[test]
    fn test_contains_requires_space_after_keyword() {
        // "contains x" has an 's' between the keyword and the token
        assert_eq!(parse_natural_query("contains x"), Err(QueryError::Unparseable));
    }

    #[test]
    fn test_combined_query() {
        let filters =
            parse_natural_query("Single word palindrome strings containing the letter a").unwrap();
        assert_eq!(
            filters,
            PredicateSet {
                is_palindrome: Some(true),
                word_count: Some(1),
                contains_character: Some("a".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_overflowing_number_is_ignored() {
        let filters = parse_natural_query("palindrome longer than 99999999999999999999").unwrap();
        assert_eq!(filters.min_length, None);
        assert_eq!(filters.is_palindrome, Some(true));
    }

    #[test]
    fn test_only_ascii_digits_count_as_numbers() {
        let filters = parse_natural_query("\u{663} words or 2 words").unwrap();
        assert_eq!(filters.word_count, Some(2));

        assert_eq!(
            parse_natural_query("longer than \u{663}"),
            Err(QueryError::Unparseable)
        );
    }
}
