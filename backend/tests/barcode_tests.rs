//! Barcode resolver tests
//!
//! Exercises the shared resolver against catalogs of real-looking
//! barcodes: exact matches beat fuzzy ones, resolution is total and
//! deterministic, and fuzzy candidates come back in catalog order.

use proptest::prelude::*;
use shared::barcode::{resolve, MatchRule, Resolution};

fn catalog<'a>(codes: &'a [Option<&'a str>]) -> impl Iterator<Item = Option<&'a str>> {
    codes.iter().copied()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_exact_match_wins_over_fuzzy() {
        // "12345" appears exactly and as a leading-zero variant elsewhere
        let codes = [Some("0012345"), Some("12345")];
        match resolve("12345", catalog(&codes)) {
            Resolution::Match { index, rule, .. } => {
                assert_eq!(index, 1);
                assert_eq!(rule, MatchRule::Exact);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_leading_zero_variants_match_both_ways() {
        let codes = [Some("0012345")];
        assert!(matches!(
            resolve("12345", catalog(&codes)),
            Resolution::Match {
                index: 0,
                rule: MatchRule::LeadingZeros,
                ..
            }
        ));

        let codes = [Some("12345")];
        assert!(matches!(
            resolve("0012345", catalog(&codes)),
            Resolution::Match {
                index: 0,
                rule: MatchRule::LeadingZeros,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_code_echoes_normalized_input() {
        let codes = [Some("12345")];
        match resolve("  99999  ", catalog(&codes)) {
            Resolution::NoMatch { normalized } => assert_eq!(normalized, "99999"),
            other => panic!("expected no match, got {other:?}"),
        }
    }

    #[test]
    fn test_products_without_barcodes_are_skipped() {
        let codes = [None, Some("12345"), None];
        assert!(matches!(
            resolve("12345", catalog(&codes)),
            Resolution::Match { index: 1, .. }
        ));
    }

    #[test]
    fn test_similarity_alternates_in_catalog_order() {
        let codes = [Some("8850001234501"), Some("8850001234502"), Some("8850001234503")];
        match resolve("8850001234599", catalog(&codes)) {
            Resolution::Match {
                index,
                rule,
                alternates,
            } => {
                assert_eq!(rule, MatchRule::Similarity);
                assert_eq!(index, 0);
                assert_eq!(alternates, vec![1, 2]);
            }
            other => panic!("expected fuzzy match, got {other:?}"),
        }
    }

    #[test]
    fn test_short_codes_never_match_by_similarity() {
        let codes = [Some("1234")];
        assert!(matches!(
            resolve("1239", catalog(&codes)),
            Resolution::NoMatch { .. }
        ));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating barcode-like strings
    fn barcode_strategy() -> impl Strategy<Value = String> {
        "[0-9]{5,13}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Resolution is deterministic: same input, same outcome
        #[test]
        fn prop_resolution_deterministic(
            code in barcode_strategy(),
            codes in prop::collection::vec(barcode_strategy(), 1..20)
        ) {
            let cat: Vec<Option<&str>> = codes.iter().map(|c| Some(c.as_str())).collect();
            let first = resolve(&code, cat.iter().copied());
            let second = resolve(&code, cat.iter().copied());
            prop_assert_eq!(first, second);
        }

        /// A code present verbatim in the catalog always resolves
        /// exactly to its own entry
        #[test]
        fn prop_exact_presence_resolves_exact(
            codes in prop::collection::vec(barcode_strategy(), 1..20),
            pick in 0usize..20
        ) {
            let pick = pick % codes.len();
            let cat: Vec<Option<&str>> = codes.iter().map(|c| Some(c.as_str())).collect();

            match resolve(&codes[pick], cat.iter().copied()) {
                Resolution::Match { index, rule, .. } => {
                    prop_assert_eq!(rule, MatchRule::Exact);
                    // First exact occurrence wins; it must carry the same code
                    prop_assert_eq!(&codes[index], &codes[pick]);
                }
                Resolution::NoMatch { .. } => prop_assert!(false, "verbatim code failed to resolve"),
            }
        }

        /// Whitespace around the scan never changes the outcome
        #[test]
        fn prop_normalization_ignores_whitespace(
            code in barcode_strategy(),
            codes in prop::collection::vec(barcode_strategy(), 1..20)
        ) {
            let cat: Vec<Option<&str>> = codes.iter().map(|c| Some(c.as_str())).collect();
            let padded = format!("  {code} ");
            prop_assert_eq!(
                resolve(&code, cat.iter().copied()),
                resolve(&padded, cat.iter().copied())
            );
        }
    }
}
