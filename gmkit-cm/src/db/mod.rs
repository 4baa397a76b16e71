//! Database access for gmkit-cm
//!
//! SQLite storage for content packs, their records, and the search-term
//! index. Tables are bootstrapped at startup with CREATE TABLE IF NOT
//! EXISTS; all timestamps are stored as RFC 3339 text.

pub mod packs;
pub mod records;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the service database in the root folder, creating the file
/// and the schema on first run.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create gmkit-cm tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_packs (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            version TEXT NOT NULL DEFAULT '1.0.0',
            author TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_records (
            id TEXT PRIMARY KEY,
            pack_id TEXT NOT NULL,
            content_type TEXT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_content_records_pack \
         ON content_records (pack_id, content_type)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_terms (
            pack_id TEXT NOT NULL,
            content_type TEXT NOT NULL,
            record_id TEXT NOT NULL,
            term TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_search_terms_term ON search_terms (term)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (content_packs, content_records, search_terms)");

    Ok(())
}
