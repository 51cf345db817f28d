//! SQLite-backed passage index.
//!
//! Each document gets its own index database holding fixed-size passages
//! with their embeddings. Once written, an index is reused as-is; it is
//! never rebuilt unless its database file is absent.

use medask_core::{AppError, AppResult};
use rusqlite::{params, Connection};
use std::path::Path;

/// A passage read back from an index.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPassage {
    pub id: String,
    pub position: u32,
    pub text: String,
}

/// A passage with its embedding, ready for insertion.
#[derive(Debug, Clone)]
pub struct IndexedPassage {
    pub id: String,
    pub position: u32,
    pub text: String,
    pub hash: String,
    pub embedding: Vec<f32>,
}

/// Open (creating if needed) an index database.
pub fn open_index(db_path: &Path) -> AppResult<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Documents(format!("Failed to create index directory: {}", e)))?;
    }

    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Documents(format!("Failed to open passage index: {}", e)))?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS passages (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            hash TEXT NOT NULL,
            embedding BLOB NOT NULL
        );
        "#,
    )
    .map_err(|e| AppError::Documents(format!("Failed to create index tables: {}", e)))?;

    tracing::debug!("Opened passage index at {:?}", db_path);
    Ok(conn)
}

/// Record index provenance: source document, embedding model, build time.
pub fn write_meta(
    conn: &Connection,
    document: &str,
    model: &str,
    dimensions: usize,
) -> AppResult<()> {
    let entries = [
        ("document", document.to_string()),
        ("model", model.to_string()),
        ("dimensions", dimensions.to_string()),
        ("built_at", chrono::Utc::now().to_rfc3339()),
    ];

    for (key, value) in entries {
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(|e| AppError::Documents(format!("Failed to write index meta: {}", e)))?;
    }

    Ok(())
}

/// Read one meta value, if present.
pub fn read_meta(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let mut stmt = conn
        .prepare("SELECT value FROM meta WHERE key = ?1")
        .map_err(|e| AppError::Documents(format!("Failed to prepare meta query: {}", e)))?;

    let mut rows = stmt
        .query(params![key])
        .map_err(|e| AppError::Documents(format!("Failed to query meta: {}", e)))?;

    match rows.next() {
        Ok(Some(row)) => Ok(row.get::<_, String>(0).ok()),
        Ok(None) => Ok(None),
        Err(e) => Err(AppError::Documents(format!("Failed to read meta: {}", e))),
    }
}

/// Insert a passage with its embedding.
pub fn insert_passage(conn: &Connection, passage: &IndexedPassage) -> AppResult<()> {
    let embedding_bytes = embedding_to_bytes(&passage.embedding);

    conn.execute(
        "INSERT OR REPLACE INTO passages (id, position, text, hash, embedding)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            passage.id,
            passage.position as i64,
            passage.text,
            passage.hash,
            embedding_bytes,
        ],
    )
    .map_err(|e| AppError::Documents(format!("Failed to insert passage: {}", e)))?;

    Ok(())
}

/// Query the index for the top-k passages most similar to the query embedding.
pub fn query_passages(
    conn: &Connection,
    query_embedding: &[f32],
    top_k: usize,
) -> AppResult<Vec<(StoredPassage, f32)>> {
    let mut stmt = conn
        .prepare("SELECT id, position, text, embedding FROM passages")
        .map_err(|e| AppError::Documents(format!("Failed to prepare passage query: {}", e)))?;

    let passages_iter = stmt
        .query_map([], |row| {
            let embedding_bytes: Vec<u8> = row.get(3)?;
            let embedding = bytes_to_embedding(&embedding_bytes)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

            Ok((
                StoredPassage {
                    id: row.get(0)?,
                    position: row.get::<_, i64>(1)? as u32,
                    text: row.get(2)?,
                },
                embedding,
            ))
        })
        .map_err(|e| AppError::Documents(format!("Failed to query passages: {}", e)))?;

    let mut results: Vec<(StoredPassage, f32)> = passages_iter
        .filter_map(|r| r.ok())
        .map(|(passage, embedding)| {
            let score = cosine_similarity(query_embedding, &embedding);
            (passage, score)
        })
        .collect();

    // Sort by score descending
    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(top_k);

    tracing::debug!(
        "Retrieved {} passages (requested top-{})",
        results.len(),
        top_k
    );

    Ok(results)
}

/// Number of passages in the index.
pub fn passage_count(conn: &Connection) -> AppResult<u32> {
    conn.query_row("SELECT COUNT(*) FROM passages", [], |row| {
        row.get::<_, i64>(0).map(|v| v as u32)
    })
    .map_err(|e| AppError::Documents(format!("Failed to count passages: {}", e)))
}

/// Convert embedding vector to little-endian bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert stored bytes back to an embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Documents(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    let mut embedding = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        embedding.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(embedding)
}

/// Calculate cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(id: &str, position: u32, text: &str, embedding: Vec<f32>) -> IndexedPassage {
        IndexedPassage {
            id: id.to_string(),
            position,
            text: text.to_string(),
            hash: "hash".to_string(),
            embedding,
        }
    }

    #[test]
    fn test_open_index_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_index(&dir.path().join("doc.db")).unwrap();

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert!(table_count >= 2);
    }

    #[test]
    fn test_insert_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_index(&dir.path().join("doc.db")).unwrap();

        insert_passage(&conn, &passage("a", 0, "about anemia", vec![1.0, 0.0, 0.0])).unwrap();
        insert_passage(&conn, &passage("b", 1, "about budgets", vec![0.0, 1.0, 0.0])).unwrap();

        let results = query_passages(&conn, &[1.0, 0.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.id, "a");
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_top_k_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_index(&dir.path().join("doc.db")).unwrap();

        for i in 0..5 {
            insert_passage(
                &conn,
                &passage(&format!("p{}", i), i, "text", vec![1.0, i as f32, 0.0]),
            )
            .unwrap();
        }

        let results = query_passages(&conn, &[1.0, 0.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_meta_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_index(&dir.path().join("doc.db")).unwrap();

        write_meta(&conn, "report.pdf", "trigram-v1", 384).unwrap();

        assert_eq!(
            read_meta(&conn, "document").unwrap(),
            Some("report.pdf".to_string())
        );
        assert_eq!(read_meta(&conn, "missing").unwrap(), None);
    }

    #[test]
    fn test_passage_count() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_index(&dir.path().join("doc.db")).unwrap();
        assert_eq!(passage_count(&conn).unwrap(), 0);

        insert_passage(&conn, &passage("a", 0, "text", vec![1.0])).unwrap();
        assert_eq!(passage_count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!((cosine_similarity(&a, &[0.0, 1.0, 0.0])).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }
}
