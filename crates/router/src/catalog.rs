//! Discovery of available data sources.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognized as record tables.
const TABLE_EXTENSIONS: [&str; 1] = ["csv"];

/// Extensions recognized as documents.
const DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

/// A snapshot of the data sources available at one point in time.
///
/// The router receives this explicitly rather than reading directories
/// itself, so tests can supply fixed fixtures.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tables: Vec<PathBuf>,
    pub documents: Vec<PathBuf>,
}

impl Catalog {
    /// Enumerate record tables and documents under the two storage
    /// directories. Missing directories yield empty lists. Entries are
    /// name-sorted so iteration order is fixed.
    pub fn discover(records_dir: &Path, documents_dir: &Path) -> Self {
        let tables = list_files(records_dir, &TABLE_EXTENSIONS);
        let documents = list_files(documents_dir, &DOCUMENT_EXTENSIONS);

        tracing::debug!(
            "Discovered {} tables and {} documents",
            tables.len(),
            documents.len()
        );

        Self { tables, documents }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.documents.is_empty()
    }
}

fn list_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|x| ext.eq_ignore_ascii_case(x)))
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}
