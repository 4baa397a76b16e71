//! Content record database operations
//!
//! Records are stored with their full JSON payload in a TEXT column, scoped
//! by pack and content type. Homebrew extra fields survive verbatim.

use gmkit_common::Result;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One stored content record, as read back for indexing
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: Uuid,
    pub content_type: String,
    pub name: String,
    pub data: Value,
}

/// Insert a batch of validated records in one transaction.
///
/// A failure on any record rolls back the whole batch; the upload pipeline
/// treats that as a hard error of the upload.
pub async fn insert_records(
    pool: &SqlitePool,
    pack_id: Uuid,
    content_type: &str,
    records: &[Value],
) -> Result<usize> {
    let pack_id = pack_id.to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;

    for record in records {
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let data = serde_json::to_string(record)?;

        sqlx::query(
            r#"
            INSERT INTO content_records (id, pack_id, content_type, name, data, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&pack_id)
        .bind(content_type)
        .bind(name)
        .bind(&data)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(records.len())
}

/// Load every record of a pack (all content types), for index rebuilds
pub async fn records_for_pack(pool: &SqlitePool, pack_id: Uuid) -> Result<Vec<StoredRecord>> {
    let rows = sqlx::query(
        "SELECT id, content_type, name, data FROM content_records WHERE pack_id = ?",
    )
    .bind(pack_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<StoredRecord> {
            let id: String = row.get("id");
            let id = Uuid::parse_str(&id).map_err(|e| {
                gmkit_common::Error::Internal(format!("Invalid record id in database: {}", e))
            })?;
            let data: String = row.get("data");
            let data: Value = serde_json::from_str(&data)?;

            Ok(StoredRecord {
                id,
                content_type: row.get("content_type"),
                name: row.get("name"),
                data,
            })
        })
        .collect()
}

/// Count records of one content type within a pack
pub async fn count_records(pool: &SqlitePool, pack_id: Uuid, content_type: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM content_records WHERE pack_id = ? AND content_type = ?",
    )
    .bind(pack_id.to_string())
    .bind(content_type)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
