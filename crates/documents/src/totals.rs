//! Currency-total extraction from document text.

use regex::Regex;
use std::sync::LazyLock;

/// Queries that should be answered by scanning for a printed total.
static TOTAL_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:total|grand total|amount due|total price)\b").unwrap()
});

/// Ordered total patterns; the first one that matches wins.
static TOTAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)Total\s*[:\-]?\s*\$?\s*([\d,]+\.\d{2})",
        r"(?i)Grand\s*Total\s*[:\-]?\s*\$?\s*([\d,]+\.\d{2})",
        r"(?i)Amount\s*Due\s*[:\-]?\s*\$?\s*([\d,]+\.\d{2})",
        r"(?i)Total\s*Price\s*[:\-]?\s*\$?\s*([\d,]+\.\d{2})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Whether the query is asking about a total amount.
pub fn wants_total(query: &str) -> bool {
    TOTAL_QUERY.is_match(query)
}

/// Scan document text for a printed total amount.
pub fn find_total(text: &str) -> Option<String> {
    for pattern in TOTAL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            return Some(caps[1].to_string());
        }
    }
    None
}
