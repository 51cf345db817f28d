//! Indicator code lookup inside document text.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum number of matching lines returned for one code.
const MAX_LINES: usize = 3;

static CODE_SHAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9_]+$").unwrap());

/// Whether a trimmed query has the shape of an indicator code.
///
/// Purely lexical; does not check that the code exists anywhere.
pub fn is_code(query: &str) -> bool {
    CODE_SHAPE.is_match(query.trim())
}

/// Find lines mentioning the code, with the code emphasized.
///
/// Returns up to the first three matching lines, newline-joined, or
/// `None` when no line mentions the code.
pub fn lookup(text: &str, code: &str) -> Option<String> {
    let highlighted: Vec<String> = text
        .lines()
        .filter(|line| line.contains(code))
        .take(MAX_LINES)
        .map(|line| line.trim().replace(code, &format!("**{}**", code)))
        .collect();

    if highlighted.is_empty() {
        None
    } else {
        Some(highlighted.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_code() {
        assert!(is_code("ANC1_HTS"));
        assert!(is_code("  ART_INIT  "));
        assert!(is_code("TB2024"));
        assert!(!is_code("anc1_hts"));
        assert!(!is_code("What is ANC1_HTS?"));
    }

    #[test]
    fn test_lookup_highlights_code() {
        let text = "Overview\nANC1_HTS: first antenatal visit tested\nOther line";
        let result = lookup(text, "ANC1_HTS").unwrap();
        assert_eq!(result, "**ANC1_HTS**: first antenatal visit tested");
    }

    #[test]
    fn test_lookup_caps_at_three_lines() {
        let text = "X ANC1\nX ANC1\nX ANC1\nX ANC1\nX ANC1";
        let result = lookup(text, "ANC1").unwrap();
        assert_eq!(result.lines().count(), 3);
    }

    #[test]
    fn test_lookup_missing_code() {
        assert_eq!(lookup("nothing relevant here", "ANC1_HTS"), None);
    }

    #[test]
    fn test_lookup_is_literal_substring_match() {
        // Codes match anywhere in the line, including inside longer tokens.
        let text = "see ANC1_HTS_V2 for details";
        let result = lookup(text, "ANC1_HTS").unwrap();
        assert!(result.contains("**ANC1_HTS**_V2"));
    }
}
