//! Upload orchestration pipeline
//!
//! Drives one content upload through its phases:
//! `Received → Validating → Persisting → Indexing → Completed`, with no
//! backward transitions. Validation outcomes are reported per item; only
//! the successfully validated subset is persisted; indexing runs only when
//! the whole batch validated, and an indexing failure is downgraded to a
//! warning rather than failing the upload.

use crate::models::{UploadPayload, UploadResult};
use crate::services::indexer::IndexingTrigger;
use crate::validators::{ContentValidator, ValidatorError};
use sqlx::SqlitePool;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Pipeline phase for one upload request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Received,
    Validating,
    Persisting,
    Indexing,
    Completed,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadPhase::Received => "received",
            UploadPhase::Validating => "validating",
            UploadPhase::Persisting => "persisting",
            UploadPhase::Indexing => "indexing",
            UploadPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Errors that terminate an upload before an UploadResult is produced
#[derive(Debug, Error)]
pub enum UploadError {
    /// Content type not in the registry; caller should consult
    /// the supported-types listing
    #[error(transparent)]
    UnknownContentType(#[from] ValidatorError),

    /// Persistence failed; nothing about the batch is reported per item
    #[error("Failed to persist content records: {0}")]
    Persistence(#[from] gmkit_common::Error),
}

/// Coordinates validate → persist → index → aggregate for one upload
pub struct UploadOrchestrator {
    db: SqlitePool,
    validator: ContentValidator,
    indexer: Arc<dyn IndexingTrigger>,
}

impl UploadOrchestrator {
    pub fn new(
        db: SqlitePool,
        validator: ContentValidator,
        indexer: Arc<dyn IndexingTrigger>,
    ) -> Self {
        Self {
            db,
            validator,
            indexer,
        }
    }

    /// Run one upload through the pipeline.
    ///
    /// Preconditions (pack existence, content-type allow-listing, non-empty
    /// payload, size ceiling) are the transport layer's responsibility and
    /// are not re-checked here.
    pub async fn upload(
        &self,
        pack_id: Uuid,
        content_type: &str,
        payload: UploadPayload,
    ) -> Result<UploadResult, UploadError> {
        debug!(pack_id = %pack_id, content_type, phase = %UploadPhase::Received, "Upload received");

        debug!(pack_id = %pack_id, content_type, phase = %UploadPhase::Validating, "Validating batch");
        let (mut result, valid_records) =
            self.validator.validate_and_partition(content_type, payload)?;

        debug!(
            pack_id = %pack_id,
            content_type,
            phase = %UploadPhase::Persisting,
            successful = result.successful_items,
            failed = result.failed_items,
            "Persisting validated records"
        );
        if !valid_records.is_empty() {
            crate::db::records::insert_records(&self.db, pack_id, content_type, &valid_records)
                .await?;
        }

        if result.is_fully_successful() {
            debug!(pack_id = %pack_id, content_type, phase = %UploadPhase::Indexing, "Triggering search indexing");
            match self.indexer.index_pack(pack_id).await {
                Ok(counts) => {
                    let indexed: usize = counts.values().sum();
                    let noun = if indexed == 1 { "item" } else { "items" };
                    result.add_warning(format!("Indexed {indexed} {noun} for search"));
                }
                Err(e) => {
                    warn!(pack_id = %pack_id, error = %e, "Search indexing failed after upload");
                    result.add_warning(
                        "Content was saved but search indexing failed; \
                         trigger a reindex to refresh search results",
                    );
                }
            }
        }

        debug!(
            pack_id = %pack_id,
            content_type,
            phase = %UploadPhase::Completed,
            total = result.total_items,
            successful = result.successful_items,
            failed = result.failed_items,
            "Upload completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ContentTypeRegistry;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fake indexer recording invocations, optionally failing
    struct FakeIndexer {
        calls: AtomicUsize,
        fail: bool,
        indexed: usize,
    }

    impl FakeIndexer {
        fn ok(indexed: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                indexed,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
                indexed: 0,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IndexingTrigger for FakeIndexer {
        async fn index_pack(&self, _pack_id: Uuid) -> anyhow::Result<HashMap<String, usize>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("embedding service unavailable");
            }
            let mut counts = HashMap::new();
            counts.insert("spells".to_string(), self.indexed);
            Ok(counts)
        }
    }

    async fn orchestrator_with(indexer: Arc<FakeIndexer>) -> (UploadOrchestrator, SqlitePool) {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        let registry = Arc::new(ContentTypeRegistry::builtin().unwrap());
        let orchestrator = UploadOrchestrator::new(
            pool.clone(),
            ContentValidator::new(registry),
            indexer,
        );
        (orchestrator, pool)
    }

    fn payload(value: serde_json::Value) -> UploadPayload {
        serde_json::from_value(value).unwrap()
    }

    fn fireball() -> serde_json::Value {
        json!({
            "name": "Fireball",
            "level": 3,
            "school": "evocation",
            "description": "A bright streak flashes to a point you choose."
        })
    }

    #[tokio::test]
    async fn full_success_indexes_and_appends_one_warning() {
        let indexer = Arc::new(FakeIndexer::ok(1));
        let (orchestrator, pool) = orchestrator_with(indexer.clone()).await;
        let pack_id = Uuid::new_v4();

        let result = orchestrator
            .upload(pack_id, "spells", payload(json!([fireball()])))
            .await
            .unwrap();

        assert!(result.is_fully_successful());
        assert_eq!(indexer.call_count(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0], "Indexed 1 item for search");

        let persisted = crate::db::records::count_records(&pool, pack_id, "spells")
            .await
            .unwrap();
        assert_eq!(persisted, 1);
    }

    #[tokio::test]
    async fn index_warning_pluralizes_for_multiple_items() {
        let indexer = Arc::new(FakeIndexer::ok(2));
        let (orchestrator, _pool) = orchestrator_with(indexer).await;

        let mut shield = fireball();
        shield["name"] = json!("Shield");
        shield["level"] = json!(1);
        let result = orchestrator
            .upload(Uuid::new_v4(), "spells", payload(json!([fireball(), shield])))
            .await
            .unwrap();

        assert_eq!(result.warnings, vec!["Indexed 2 items for search".to_string()]);
    }

    #[tokio::test]
    async fn indexing_failure_is_downgraded_to_a_warning() {
        let indexer = Arc::new(FakeIndexer::failing());
        let (orchestrator, _pool) = orchestrator_with(indexer.clone()).await;

        let result = orchestrator
            .upload(Uuid::new_v4(), "spells", payload(json!([fireball()])))
            .await
            .unwrap();

        assert!(result.is_fully_successful());
        assert_eq!(indexer.call_count(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("indexing failed"));
    }

    #[tokio::test]
    async fn partial_failure_skips_indexing_and_persists_valid_subset() {
        let indexer = Arc::new(FakeIndexer::ok(2));
        let (orchestrator, pool) = orchestrator_with(indexer.clone()).await;
        let pack_id = Uuid::new_v4();

        let result = orchestrator
            .upload(
                pack_id,
                "spells",
                payload(json!([fireball(), {"name": "Broken"}])),
            )
            .await
            .unwrap();

        assert_eq!(result.total_items, 2);
        assert_eq!(result.successful_items, 1);
        assert_eq!(result.failed_items, 1);
        assert_eq!(indexer.call_count(), 0);
        assert!(result.warnings.is_empty());

        let persisted = crate::db::records::count_records(&pool, pack_id, "spells")
            .await
            .unwrap();
        assert_eq!(persisted, 1);
    }

    #[tokio::test]
    async fn unknown_content_type_is_rejected_before_any_result() {
        let indexer = Arc::new(FakeIndexer::ok(0));
        let (orchestrator, pool) = orchestrator_with(indexer.clone()).await;
        let pack_id = Uuid::new_v4();

        let err = orchestrator
            .upload(pack_id, "vehicles", payload(json!([fireball()])))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::UnknownContentType(_)));
        assert_eq!(indexer.call_count(), 0);
        let persisted = crate::db::records::count_records(&pool, pack_id, "vehicles")
            .await
            .unwrap();
        assert_eq!(persisted, 0);
    }
}
