//! Content pack database operations

use crate::models::ContentPack;
use chrono::Utc;
use gmkit_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Insert a new content pack
pub async fn create_pack(pool: &SqlitePool, pack: &ContentPack) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO content_packs (id, name, description, version, author, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(pack.id.to_string())
    .bind(&pack.name)
    .bind(&pack.description)
    .bind(&pack.version)
    .bind(&pack.author)
    .bind(pack.is_active as i64)
    .bind(pack.created_at.to_rfc3339())
    .bind(pack.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a content pack by id
pub async fn get_pack(pool: &SqlitePool, pack_id: Uuid) -> Result<Option<ContentPack>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, version, author, is_active, created_at, updated_at
        FROM content_packs
        WHERE id = ?
        "#,
    )
    .bind(pack_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(pack_from_row).transpose()
}

/// List all content packs, newest first
pub async fn list_packs(pool: &SqlitePool) -> Result<Vec<ContentPack>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, description, version, author, is_active, created_at, updated_at
        FROM content_packs
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(pack_from_row).collect()
}

/// Toggle a pack's active flag. Returns false when the pack does not exist.
pub async fn set_pack_active(pool: &SqlitePool, pack_id: Uuid, is_active: bool) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE content_packs SET is_active = ?, updated_at = ? WHERE id = ?",
    )
    .bind(is_active as i64)
    .bind(Utc::now().to_rfc3339())
    .bind(pack_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a pack together with its records and search terms.
/// Returns false when the pack does not exist.
pub async fn delete_pack(pool: &SqlitePool, pack_id: Uuid) -> Result<bool> {
    let pack_id = pack_id.to_string();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM search_terms WHERE pack_id = ?")
        .bind(&pack_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM content_records WHERE pack_id = ?")
        .bind(&pack_id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM content_packs WHERE id = ?")
        .bind(&pack_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

fn pack_from_row(row: sqlx::sqlite::SqliteRow) -> Result<ContentPack> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|e| gmkit_common::Error::Internal(format!("Invalid pack id in database: {}", e)))?;

    let created_at: String = row.get("created_at");
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| gmkit_common::Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&chrono::Utc);

    let updated_at: String = row.get("updated_at");
    let updated_at = chrono::DateTime::parse_from_rfc3339(&updated_at)
        .map_err(|e| gmkit_common::Error::Internal(format!("Failed to parse updated_at: {}", e)))?
        .with_timezone(&chrono::Utc);

    let is_active: i64 = row.get("is_active");

    Ok(ContentPack {
        id,
        name: row.get("name"),
        description: row.get("description"),
        version: row.get("version"),
        author: row.get("author"),
        is_active: is_active != 0,
        created_at,
        updated_at,
    })
}
