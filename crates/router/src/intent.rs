//! Query intent classification.
//!
//! Fixed lexical heuristics only: canned phrases are checked first, then
//! the indicator-code shape, then tabular keywords. No side effects, and
//! deterministic for a given query.

use regex::Regex;
use std::sync::LazyLock;

/// Canned phrases and their fixed answers, checked before anything else.
const CANNED_ANSWERS: [(&str, &str); 3] = [
    ("blood pressure", "Normal blood pressure is around 120 over 80."),
    (
        "viral load",
        "Viral load monitoring helps track HIV treatment success.",
    ),
    ("data report", "Fetching your facility's data report..."),
];

/// Keywords that mark a query as answerable from record tables.
const STRUCTURED_KEYWORDS: [&str; 15] = [
    "patient",
    "patientid",
    "diagnosed",
    "diagnosis",
    "treatment",
    "facility",
    "clinic",
    "region",
    "cost",
    "price",
    "amount",
    "bill",
    "visit",
    "who was treated",
    "what is the name of patient with",
];

/// Indicator-style codes: four or more characters drawn from uppercase
/// letters, digits, and underscore (ANC1_HTS, ART_INIT, ...).
static CODE_SHAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9_]{4,}$").unwrap());

/// Classification of one input query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// A recognized phrase with a fixed answer, bypassing all sources.
    Canned(&'static str),

    /// An indicator-style code to look up verbatim in documents.
    CodeLookup,

    /// A question answerable by filtering/aggregating record tables.
    Structured,

    /// Anything else; documents are the only candidates.
    Unstructured,
}

/// Classify a raw query.
pub fn classify(query: &str) -> Intent {
    let trimmed = query.trim();
    let lowered = trimmed.to_lowercase();

    for (phrase, answer) in CANNED_ANSWERS {
        if lowered.contains(phrase) {
            return Intent::Canned(answer);
        }
    }

    if CODE_SHAPE.is_match(trimmed) {
        return Intent::CodeLookup;
    }

    if STRUCTURED_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Intent::Structured;
    }

    Intent::Unstructured
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_phrases() {
        assert_eq!(
            classify("what is a normal blood pressure reading?"),
            Intent::Canned("Normal blood pressure is around 120 over 80.")
        );
        assert!(matches!(classify("explain viral load"), Intent::Canned(_)));
        assert!(matches!(classify("show me the data report"), Intent::Canned(_)));
    }

    #[test]
    fn test_canned_beats_structured_keywords() {
        // "patient" is a structured keyword, but the canned phrase wins.
        assert!(matches!(
            classify("blood pressure for patient P001"),
            Intent::Canned(_)
        ));
    }

    #[test]
    fn test_code_shape() {
        assert_eq!(classify("ANC1_HTS"), Intent::CodeLookup);
        assert_eq!(classify("  ART_INIT "), Intent::CodeLookup);
        assert_eq!(classify("TB24"), Intent::CodeLookup);
    }

    #[test]
    fn test_code_shape_requires_four_chars() {
        // Too short for a code, no keywords either
        assert_eq!(classify("TB2"), Intent::Unstructured);
    }

    #[test]
    fn test_code_shape_is_case_sensitive() {
        assert_eq!(classify("anc1_hts"), Intent::Unstructured);
    }

    #[test]
    fn test_structured_keywords() {
        assert_eq!(
            classify("What is the treatment for patient P003?"),
            Intent::Structured
        );
        assert_eq!(classify("Who was treated at Clinic D?"), Intent::Structured);
        assert_eq!(classify("total cost in the North region"), Intent::Structured);
    }

    #[test]
    fn test_unstructured_default() {
        assert_eq!(
            classify("summarize the immunization guidelines"),
            Intent::Unstructured
        );
    }
}
