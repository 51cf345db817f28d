//! Durable passage store with build-if-absent semantics.

use crate::embeddings::EmbeddingProvider;
use crate::index::{self, IndexedPassage, StoredPassage};
use crate::{extract, passage};
use medask_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owns the passage indexes for all documents.
///
/// An index is built at most once per document identity (file stem) and
/// persisted under the index directory; subsequent calls reuse the stored
/// index without touching the embedding backend. First-time builds for
/// the same document are serialized through a per-identity lock.
pub struct PassageStore {
    index_dir: PathBuf,
    provider: Arc<dyn EmbeddingProvider>,
    passage_size: usize,
    build_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PassageStore {
    pub fn new(
        index_dir: impl Into<PathBuf>,
        provider: Arc<dyn EmbeddingProvider>,
        passage_size: usize,
    ) -> Self {
        Self {
            index_dir: index_dir.into(),
            provider,
            passage_size,
            build_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Database path for a document's index.
    pub fn index_path(&self, document: &Path) -> PathBuf {
        self.index_dir
            .join(format!("{}.db", extract::document_stem(document)))
    }

    /// Whether a persisted index already exists for the document.
    pub fn has_index(&self, document: &Path) -> bool {
        self.index_path(document).exists()
    }

    /// Ensure the document's passage index exists, building it if absent.
    ///
    /// Returns the index database path. The build extracts text, splits it
    /// into passages, embeds them, and writes the database in one pass; a
    /// failed build leaves no database behind, so the next call retries.
    pub async fn ensure_index(&self, document: &Path) -> AppResult<PathBuf> {
        let stem = extract::document_stem(document);

        let gate = {
            let mut locks = self.build_locks.lock().await;
            locks
                .entry(stem.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = gate.lock().await;

        let db_path = self.index_path(document);
        if db_path.exists() {
            tracing::debug!("Reusing passage index for '{}'", stem);
            return Ok(db_path);
        }

        tracing::info!("Building passage index for '{}'", stem);

        let text = extract::extract_text(document)?;
        let passages = passage::split_passages(&text, self.passage_size);

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let embeddings = self.provider.embed_batch(&texts).await?;

        if embeddings.len() != passages.len() {
            return Err(AppError::Embedding(format!(
                "Embedding count mismatch: {} passages, {} embeddings",
                passages.len(),
                embeddings.len()
            )));
        }

        // Write to a temporary file first so a failed build never leaves a
        // partial index that would be mistaken for a complete one.
        let tmp_path = db_path.with_extension("db.tmp");
        let result = self.write_index(&tmp_path, &stem, &passages, embeddings);

        match result {
            Ok(()) => {
                std::fs::rename(&tmp_path, &db_path).map_err(|e| {
                    AppError::Documents(format!("Failed to finalize passage index: {}", e))
                })?;
                tracing::info!("Indexed {} passages for '{}'", passages.len(), stem);
                Ok(db_path)
            }
            Err(e) => {
                let _ = std::fs::remove_file(&tmp_path);
                Err(e)
            }
        }
    }

    fn write_index(
        &self,
        db_path: &Path,
        stem: &str,
        passages: &[passage::Passage],
        embeddings: Vec<Vec<f32>>,
    ) -> AppResult<()> {
        let conn = index::open_index(db_path)?;
        index::write_meta(
            &conn,
            stem,
            self.provider.model_name(),
            self.provider.dimensions(),
        )?;

        for (p, embedding) in passages.iter().zip(embeddings) {
            let indexed = IndexedPassage {
                id: uuid::Uuid::new_v4().to_string(),
                position: p.position,
                text: p.text.clone(),
                hash: content_hash(&p.text),
                embedding,
            };
            index::insert_passage(&conn, &indexed)?;
        }

        Ok(())
    }

    /// Retrieve the top-k passages most similar to the query.
    ///
    /// Builds the index first when absent; an existing index is used
    /// without any embedding computation beyond the query itself.
    pub async fn search(
        &self,
        document: &Path,
        query: &str,
        top_k: usize,
    ) -> AppResult<Vec<(StoredPassage, f32)>> {
        let db_path = self.ensure_index(document).await?;
        let query_embedding = self.provider.embed(query).await?;

        let conn = index::open_index(&db_path)?;
        index::query_passages(&conn, &query_embedding, top_k)
    }

    /// Number of passages stored for a document, if it has an index.
    pub fn indexed_passages(&self, document: &Path) -> AppResult<Option<u32>> {
        let db_path = self.index_path(document);
        if !db_path.exists() {
            return Ok(None);
        }
        let conn = index::open_index(&db_path)?;
        index::passage_count(&conn).map(Some)
    }
}

fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{:x}", digest)
}
