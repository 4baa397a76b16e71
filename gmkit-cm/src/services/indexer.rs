//! Search indexing trigger
//!
//! After a fully successful upload the orchestrator asks the indexer to
//! re-index the pack so new records become searchable. Indexing failures
//! are never fatal to an upload; callers catch the error and downgrade it
//! to a warning. The trait seam exists so the orchestrator can be tested
//! with fakes.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-pack index rebuild, returning records indexed per content type
#[async_trait]
pub trait IndexingTrigger: Send + Sync {
    async fn index_pack(&self, pack_id: Uuid) -> anyhow::Result<HashMap<String, usize>>;
}

/// Term-based search indexer over the `search_terms` table
///
/// Rebuilds a pack's index from scratch on every trigger: deletes the
/// pack's existing term rows, then extracts lowercase terms from each
/// stored record's name and description.
pub struct SearchIndexer {
    db: SqlitePool,
}

impl SearchIndexer {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IndexingTrigger for SearchIndexer {
    async fn index_pack(&self, pack_id: Uuid) -> anyhow::Result<HashMap<String, usize>> {
        let records = crate::db::records::records_for_pack(&self.db, pack_id).await?;

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM search_terms WHERE pack_id = ?")
            .bind(pack_id.to_string())
            .execute(&mut *tx)
            .await?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in &records {
            let terms = extract_terms(&record.name, record.data.get("description"));
            for term in terms {
                sqlx::query(
                    "INSERT INTO search_terms (pack_id, content_type, record_id, term) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(pack_id.to_string())
                .bind(&record.content_type)
                .bind(record.id.to_string())
                .bind(&term)
                .execute(&mut *tx)
                .await?;
            }
            *counts.entry(record.content_type.clone()).or_insert(0) += 1;
        }

        tx.commit().await?;

        tracing::info!(
            pack_id = %pack_id,
            records = records.len(),
            "Search index rebuilt for pack"
        );

        Ok(counts)
    }
}

/// Lowercase, deduplicated terms from a record's name and description
fn extract_terms(name: &str, description: Option<&Value>) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    let description = description.and_then(Value::as_str).unwrap_or_default();
    for word in name.split_whitespace().chain(description.split_whitespace()) {
        let term: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        // Single characters are noise ("a", "I") and match everything
        if term.len() > 1 && !terms.contains(&term) {
            terms.push(term);
        }
    }

    terms
}
