//! Document matching.
//!
//! A query is tried against one document in three steps: currency-total
//! extraction, indicator code lookup, then semantic passage retrieval as
//! the last resort.

use crate::store::PassageStore;
use crate::{extract, indicator, totals};
use medask_core::{Answer, AppError};
use std::path::Path;

/// Number of passages retrieved on the semantic path.
pub const RETRIEVAL_TOP_K: usize = 3;

/// Maximum characters of one passage shown in an answer.
pub const SNIPPET_MAX_CHARS: usize = 300;

/// Match one query against one document.
pub async fn match_document(document: &Path, query: &str, store: &PassageStore) -> Answer {
    let name = extract::document_name(document);
    let query = query.trim();

    // Step 1: printed totals; terminal whether or not one is found
    if totals::wants_total(query) {
        let text = match extract::extract_text(document) {
            Ok(text) => text,
            Err(e) => return source_failure(&name, e),
        };

        return match totals::find_total(&text) {
            Some(amount) => Answer::answered(format!("The total in {} is ${}.", name, amount)),
            None => Answer::answered(format!("No total amount was detected in {}.", name)),
        };
    }

    // Step 2: indicator code lookup
    if indicator::is_code(query) {
        let text = match extract::extract_text(document) {
            Ok(text) => text,
            Err(e) => return source_failure(&name, e),
        };

        return match indicator::lookup(&text, query) {
            Some(lines) => Answer::answered(lines),
            None => {
                tracing::debug!("No definition for '{}' in {}", query, name);
                Answer::NoMatch
            }
        };
    }

    // Step 3: semantic passage retrieval
    match store.search(document, query, RETRIEVAL_TOP_K).await {
        Ok(hits) if hits.is_empty() => Answer::NoMatch,
        Ok(hits) => Answer::answered(format_hits(&hits)),
        Err(e) => match e {
            AppError::Documents(_) | AppError::Io(_) => source_failure(&name, e),
            other => {
                tracing::warn!("Semantic retrieval failed for {}: {}", name, other);
                Answer::Backend(other.to_string())
            }
        },
    }
}

fn source_failure(name: &str, error: AppError) -> Answer {
    tracing::warn!("Could not read document {}: {}", name, error);
    Answer::NotFound(name.to_string())
}

/// Format retrieved passages as a numbered, blank-line-separated list.
fn format_hits(hits: &[(crate::index::StoredPassage, f32)]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, (passage, _score))| {
            format!("Result {}: {}", i + 1, snippet(&passage.text))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Flatten a passage to one line and cap its length.
fn snippet(text: &str) -> String {
    let flat = text.trim().replace('\n', " ");
    if flat.chars().count() <= SNIPPET_MAX_CHARS {
        flat
    } else {
        let truncated: String = flat.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::mock::MockProvider;
    use crate::index::StoredPassage;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn test_store(dir: &Path) -> PassageStore {
        PassageStore::new(
            dir.join("index"),
            Arc::new(MockProvider::new(128)),
            200,
        )
    }

    fn write_doc(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_total_query_answers() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_doc(dir.path(), "invoice.txt", "Consultation 40.00\nTotal: $152.75\n");
        let store = test_store(dir.path());

        let answer = match_document(&doc, "What is the total price?", &store).await;
        assert_eq!(
            answer,
            Answer::answered("The total in invoice.txt is $152.75.")
        );
    }

    #[tokio::test]
    async fn test_total_query_is_terminal_without_total() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_doc(dir.path(), "notes.txt", "No figures here.");
        let store = test_store(dir.path());

        let answer = match_document(&doc, "what is the amount due?", &store).await;
        assert_eq!(
            answer,
            Answer::answered("No total amount was detected in notes.txt.")
        );
    }

    #[tokio::test]
    async fn test_code_lookup_hit() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_doc(
            dir.path(),
            "indicators.txt",
            "Overview\nANC1_HTS: first antenatal visit tested for HIV\n",
        );
        let store = test_store(dir.path());

        let answer = match_document(&doc, "ANC1_HTS", &store).await;
        assert_eq!(
            answer,
            Answer::answered("**ANC1_HTS**: first antenatal visit tested for HIV")
        );
    }

    #[tokio::test]
    async fn test_code_lookup_miss_is_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_doc(dir.path(), "indicators.txt", "nothing relevant");
        let store = test_store(dir.path());

        let answer = match_document(&doc, "ART_INIT", &store).await;
        assert_eq!(answer, Answer::NoMatch);
    }

    #[tokio::test]
    async fn test_semantic_retrieval_formats_results() {
        let dir = tempfile::tempdir().unwrap();
        let text = "Anemia is treated with iron supplements. ".repeat(20);
        let doc = write_doc(dir.path(), "guide.txt", &text);
        let store = test_store(dir.path());

        let answer = match_document(&doc, "how is anemia treated", &store).await;
        let Answer::Answered(text) = answer else {
            panic!("expected an answered result");
        };
        assert!(text.starts_with("Result 1: "));
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let answer =
            match_document(&dir.path().join("absent.txt"), "anything at all here", &store).await;
        assert_eq!(answer, Answer::NotFound("absent.txt".to_string()));
    }

    #[test]
    fn test_snippet_truncation() {
        let long = "x".repeat(400);
        let result = snippet(&long);
        assert_eq!(result.chars().count(), SNIPPET_MAX_CHARS + 3);
        assert!(result.ends_with("..."));

        assert_eq!(snippet("short\ntext"), "short text");
    }

    #[test]
    fn test_format_hits_numbering() {
        let hits = vec![
            (
                StoredPassage {
                    id: "a".to_string(),
                    position: 0,
                    text: "first passage".to_string(),
                },
                0.9,
            ),
            (
                StoredPassage {
                    id: "b".to_string(),
                    position: 1,
                    text: "second passage".to_string(),
                },
                0.5,
            ),
        ];

        let formatted = format_hits(&hits);
        assert_eq!(formatted, "Result 1: first passage\n\nResult 2: second passage");
    }
}
