//! Query routing for medask.
//!
//! Combines the intent classifier with iteration over the available
//! record tables and documents. Precedence is fixed: canned answers,
//! then documents for code lookups, then tables for structured queries,
//! then documents for everything that remains. The first substantive
//! answer wins; every other outcome is recorded and iteration continues,
//! so a single failing source never aborts a routing attempt.

pub mod catalog;
pub mod intent;

#[cfg(test)]
mod tests;

pub use catalog::Catalog;
pub use intent::{classify, Intent};

use medask_core::{Answer, AppConfig, AppResult};
use medask_documents::{matcher::match_document, PassageStore, DEFAULT_PASSAGE_SIZE};
use medask_records::{loader, matcher::match_table};
use std::path::{Path, PathBuf};

/// Fixed fallback shown when no source produces anything usable.
pub const FALLBACK_ANSWER: &str = "I'm not sure how to help with that. Try asking about a \
     patient, a diagnosis, a facility, a region, or an indicator code like ANC1_HTS.";

/// Route one query across the catalog and return a tagged answer.
pub async fn route(query: &str, catalog: &Catalog, store: &PassageStore) -> Answer {
    let intent = intent::classify(query);
    tracing::debug!("Classified query as {:?}", intent);

    // Stage 1: canned answers bypass every source
    if let Intent::Canned(text) = intent {
        return Answer::answered(text);
    }

    let mut last_failure: Option<Answer> = None;

    // Stage 2: code lookups try documents first, then fall through to the
    // general document stage below rather than straight to the fallback
    if intent == Intent::CodeLookup {
        if let Some(answer) = try_documents(query, catalog, store, &mut last_failure).await {
            return answer;
        }
    }

    // Stage 3: structured queries try every table, each loaded fresh
    if intent == Intent::Structured {
        for table_path in &catalog.tables {
            let outcome = match loader::load_table(table_path) {
                Ok(table) => match_table(&table, query),
                Err(e) => {
                    tracing::warn!("Skipping table {}: {}", table_path.display(), e);
                    Answer::NotFound(source_name(table_path))
                }
            };

            if outcome.is_answered() {
                return outcome;
            }
            last_failure = Some(outcome);
        }
        // A structured query that matched on no table is retried against
        // documents below.
    }

    // Stage 4: documents, for every intent that reaches this point
    if let Some(answer) = try_documents(query, catalog, store, &mut last_failure).await {
        return answer;
    }

    // Stage 5: the last recorded failure, or a bare no-match
    last_failure.unwrap_or(Answer::NoMatch)
}

async fn try_documents(
    query: &str,
    catalog: &Catalog,
    store: &PassageStore,
    last_failure: &mut Option<Answer>,
) -> Option<Answer> {
    for document in &catalog.documents {
        let outcome = match_document(document, query, store).await;
        if outcome.is_answered() {
            return Some(outcome);
        }
        tracing::debug!(
            "Document {} produced no answer, trying next source",
            document.display()
        );
        *last_failure = Some(outcome);
    }
    None
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("source")
        .to_string()
}

/// Render a tagged answer for presentation.
///
/// This is the only place where no-match and failure outcomes get
/// wording; matchers themselves stay wording-free.
pub fn render(answer: &Answer) -> String {
    match answer {
        Answer::Answered(text) => text.clone(),
        Answer::NoMatch => FALLBACK_ANSWER.to_string(),
        Answer::NotFound(name) => format!("Could not read data source '{}'.", name),
        Answer::Backend(detail) => format!("Search backend error: {}", detail),
    }
}

/// The caller-facing boundary of the routing core.
///
/// Owns the storage locations and the passage store; everything else
/// (chat shell, voice I/O, logging of conversations) lives outside and
/// depends only on [`Assistant::handle_task`].
pub struct Assistant {
    records_dir: PathBuf,
    documents_dir: PathBuf,
    store: PassageStore,
}

impl Assistant {
    /// Build an assistant from application configuration.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;
        let provider = medask_documents::create_provider(
            &config.embed_provider,
            &config.embed_model,
            config.embed_dimensions,
        )?;
        let store = PassageStore::new(config.index_dir(), provider, DEFAULT_PASSAGE_SIZE);

        Ok(Self {
            records_dir: config.records_dir.clone(),
            documents_dir: config.documents_dir.clone(),
            store,
        })
    }

    /// Build an assistant over explicit directories and a prepared store.
    pub fn with_store(
        records_dir: impl Into<PathBuf>,
        documents_dir: impl Into<PathBuf>,
        store: PassageStore,
    ) -> Self {
        Self {
            records_dir: records_dir.into(),
            documents_dir: documents_dir.into(),
            store,
        }
    }

    /// Answer one user input.
    ///
    /// Discovers a fresh snapshot of available sources, routes the query,
    /// and renders the outcome. A pure function of the input plus the
    /// current contents of the storage directories.
    pub async fn handle_task(&self, user_input: &str) -> String {
        let query = user_input.trim();
        if query.is_empty() {
            return render(&Answer::NoMatch);
        }

        let catalog = Catalog::discover(&self.records_dir, &self.documents_dir);
        let answer = route(query, &catalog, &self.store).await;
        render(&answer)
    }

    /// The passage store backing semantic retrieval.
    pub fn store(&self) -> &PassageStore {
        &self.store
    }

    /// Discover the current source snapshot.
    pub fn catalog(&self) -> Catalog {
        Catalog::discover(&self.records_dir, &self.documents_dir)
    }
}
