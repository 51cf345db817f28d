//! Document plain-text extraction.

use medask_core::{AppError, AppResult};
use std::path::Path;

/// Extract the plain-text rendering of a document.
///
/// PDFs go through pdf-extract; plain-text and markdown documents are
/// read as-is. Extraction happens per query and is never cached.
pub fn extract_text(path: &Path) -> AppResult<String> {
    if !path.exists() {
        return Err(AppError::Documents(format!(
            "Document not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => pdf_extract::extract_text(path).map_err(|e| {
            AppError::Documents(format!("Failed to extract text from {}: {}", path.display(), e))
        }),
        "txt" | "md" => std::fs::read_to_string(path).map_err(|e| {
            AppError::Documents(format!("Failed to read {}: {}", path.display(), e))
        }),
        other => Err(AppError::Documents(format!(
            "Unsupported document type '{}': {}",
            other,
            path.display()
        ))),
    }
}

/// File name of a document, for use in user-facing messages.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string()
}

/// File stem of a document; the identity the passage index is keyed by.
pub fn document_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guidelines.txt");
        std::fs::write(&path, "ANC1_HTS: first antenatal visit with HIV test.").unwrap();

        let text = extract_text(&path).unwrap();
        assert!(text.contains("ANC1_HTS"));
    }

    #[test]
    fn test_extract_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_text(&dir.path().join("absent.pdf"));
        assert!(matches!(result, Err(AppError::Documents(_))));
    }

    #[test]
    fn test_extract_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();

        let result = extract_text(&path);
        assert!(matches!(result, Err(AppError::Documents(_))));
    }

    #[test]
    fn test_document_identity() {
        let path = Path::new("documents/indicator_reference.pdf");
        assert_eq!(document_name(path), "indicator_reference.pdf");
        assert_eq!(document_stem(path), "indicator_reference");
    }
}
