//! Barcode resolution
//!
//! Maps a raw scanned or hand-typed code to at most one catalog entry
//! through a deterministic fallback chain:
//!
//! 1. Exact string equality against the stored barcode
//! 2. Case-insensitive equality
//! 3. Leading-zero-insensitive equality, in either direction
//! 4. Similarity: the stored barcode contains the first or last
//!    [`SIMILARITY_WINDOW`] characters of the normalized input
//!
//! Rules 1-3 identify a single product. Rule 4 can produce several
//! candidates; the first one in catalog order wins and the rest are
//! surfaced as alternates so the caller can disambiguate before
//! committing anything against a fuzzy match.
//!
//! The function is total: it always returns either a match or
//! [`Resolution::NoMatch`] carrying the normalized input so the caller
//! can offer manual product creation.

use serde::Serialize;

/// Number of characters compared from each end of the input under the
/// similarity rule.
pub const SIMILARITY_WINDOW: usize = 5;

/// Which rule of the fallback chain produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Exact,
    CaseInsensitive,
    LeadingZeros,
    Similarity,
}

/// Outcome of resolving a raw code against a catalog.
///
/// Indices refer to positions in the iterator passed to [`resolve`],
/// which must therefore be in a stable catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Match {
        index: usize,
        rule: MatchRule,
        /// Other candidates that also satisfied the similarity rule.
        /// Empty for rules 1-3.
        alternates: Vec<usize>,
    },
    NoMatch {
        /// The normalized input, echoed back for the caller.
        normalized: String,
    },
}

/// Normalizes a raw scanned code: surrounding whitespace is stripped,
/// the code itself is preserved verbatim.
pub fn normalize(raw_code: &str) -> String {
    raw_code.trim().to_string()
}

/// Strips leading zeros, keeping a single zero for all-zero codes so
/// `"000"` and `"0"` still compare equal without matching everything.
fn strip_leading_zeros(code: &str) -> &str {
    let stripped = code.trim_start_matches('0');
    if stripped.is_empty() && !code.is_empty() {
        "0"
    } else {
        stripped
    }
}

/// Resolves a raw code against the stored barcodes of a catalog.
///
/// `barcodes` yields the stored barcode of each catalog entry in
/// catalog order (`None` for products without a barcode).
pub fn resolve<'a, I>(raw_code: &str, barcodes: I) -> Resolution
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let codes: Vec<Option<&str>> = barcodes.into_iter().collect();
    let normalized = normalize(raw_code);

    if normalized.is_empty() {
        return Resolution::NoMatch { normalized };
    }

    // Rule 1: exact equality
    for (index, code) in codes.iter().enumerate() {
        if *code == Some(normalized.as_str()) {
            return Resolution::Match {
                index,
                rule: MatchRule::Exact,
                alternates: Vec::new(),
            };
        }
    }

    // Rule 2: case-insensitive equality
    for (index, code) in codes.iter().enumerate() {
        if let Some(code) = code {
            if code.eq_ignore_ascii_case(&normalized) {
                return Resolution::Match {
                    index,
                    rule: MatchRule::CaseInsensitive,
                    alternates: Vec::new(),
                };
            }
        }
    }

    // Rule 3: leading-zero-insensitive equality in either direction
    let zeroless = strip_leading_zeros(&normalized);
    for (index, code) in codes.iter().enumerate() {
        if let Some(code) = code {
            if strip_leading_zeros(code) == zeroless {
                return Resolution::Match {
                    index,
                    rule: MatchRule::LeadingZeros,
                    alternates: Vec::new(),
                };
            }
        }
    }

    // Rule 4: similarity on the first/last characters of the input.
    // Byte slicing is only safe on ASCII input; non-ASCII codes skip
    // straight to NoMatch.
    if normalized.is_ascii() && normalized.len() >= SIMILARITY_WINDOW {
        let head = &normalized[..SIMILARITY_WINDOW];
        let tail = &normalized[normalized.len() - SIMILARITY_WINDOW..];

        let mut candidates = codes.iter().enumerate().filter_map(|(index, code)| {
            code.filter(|c| c.contains(head) || c.contains(tail))
                .map(|_| index)
        });

        if let Some(index) = candidates.next() {
            return Resolution::Match {
                index,
                rule: MatchRule::Similarity,
                alternates: candidates.collect(),
            };
        }
    }

    Resolution::NoMatch { normalized }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog<'a>(codes: &'a [Option<&'a str>]) -> impl Iterator<Item = Option<&'a str>> {
        codes.iter().copied()
    }

    #[test]
    fn exact_match_wins_over_fuzzy_candidates() {
        // A product sharing the first five characters must not shadow
        // the literal match.
        let codes = [Some("123456999999"), Some("123456789012")];
        let resolution = resolve("123456789012", catalog(&codes));

        assert_eq!(
            resolution,
            Resolution::Match {
                index: 1,
                rule: MatchRule::Exact,
                alternates: vec![],
            }
        );
    }

    #[test]
    fn case_insensitive_fallback() {
        let codes = [Some("ABC-123")];
        let resolution = resolve("abc-123", catalog(&codes));

        assert!(matches!(
            resolution,
            Resolution::Match {
                index: 0,
                rule: MatchRule::CaseInsensitive,
                ..
            }
        ));
    }

    #[test]
    fn leading_zeros_stripped_from_input() {
        let codes = [Some("12345")];
        let resolution = resolve("0012345", catalog(&codes));

        assert!(matches!(
            resolution,
            Resolution::Match {
                index: 0,
                rule: MatchRule::LeadingZeros,
                ..
            }
        ));
    }

    #[test]
    fn leading_zeros_stripped_from_stored_value() {
        let codes = [Some("0012345")];
        let resolution = resolve("12345", catalog(&codes));

        assert!(matches!(
            resolution,
            Resolution::Match {
                index: 0,
                rule: MatchRule::LeadingZeros,
                ..
            }
        ));
    }

    #[test]
    fn similarity_surfaces_alternates_in_catalog_order() {
        let codes = [Some("XX54321XX"), Some("12345-A"), Some("ZZ12345")];
        let resolution = resolve("1234554321", catalog(&codes));

        // head "12345" matches indices 1 and 2, tail "54321" matches 0;
        // index 0 is first in catalog order.
        assert_eq!(
            resolution,
            Resolution::Match {
                index: 0,
                rule: MatchRule::Similarity,
                alternates: vec![1, 2],
            }
        );
    }

    #[test]
    fn no_overlap_returns_normalized_input() {
        let codes = [Some("99999"), None];
        let resolution = resolve("  ABCDEF  ", catalog(&codes));

        assert_eq!(
            resolution,
            Resolution::NoMatch {
                normalized: "ABCDEF".to_string(),
            }
        );
    }

    #[test]
    fn empty_input_never_matches() {
        let codes = [Some(""), Some("12345")];
        let resolution = resolve("   ", catalog(&codes));

        assert!(matches!(resolution, Resolution::NoMatch { .. }));
    }

    #[test]
    fn products_without_barcode_are_skipped() {
        let codes = [None, Some("12345")];
        let resolution = resolve("12345", catalog(&codes));

        assert!(matches!(resolution, Resolution::Match { index: 1, .. }));
    }

    #[test]
    fn short_input_does_not_fall_through_to_similarity() {
        // Inputs shorter than the similarity window only match on the
        // equality rules.
        let codes = [Some("12345678")];
        let resolution = resolve("1234", catalog(&codes));

        assert!(matches!(resolution, Resolution::NoMatch { .. }));
    }

    #[test]
    fn all_zero_codes_compare_equal_but_do_not_match_everything() {
        let codes = [Some("12345"), Some("0000")];
        let resolution = resolve("0", catalog(&codes));

        assert!(matches!(
            resolution,
            Resolution::Match {
                index: 1,
                rule: MatchRule::LeadingZeros,
                ..
            }
        ));
    }
}
