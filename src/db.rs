//! # Raw Input Storage
//!
//! Persists the last pasted order list per chat so it survives restarts.
//! Only the raw text is stored; records are always re-derived by parsing.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::{debug, info};

/// A stored raw order list
#[derive(Debug, Clone, PartialEq)]
pub struct StoredInput {
    pub chat_id: i64,
    pub storage_key: String,
    pub raw_text: String,
    pub updated_at: DateTime<Utc>,
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS raw_inputs (
            chat_id BIGINT NOT NULL,
            storage_key TEXT NOT NULL,
            raw_text TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (chat_id, storage_key)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create raw_inputs table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Insert or replace the raw text stored under `storage_key` for a chat
pub async fn save_raw_input(
    pool: &PgPool,
    chat_id: i64,
    storage_key: &str,
    raw_text: &str,
) -> Result<()> {
    debug!(chat_id, storage_key, bytes = raw_text.len(), "Saving raw input");

    sqlx::query(
        "INSERT INTO raw_inputs (chat_id, storage_key, raw_text, updated_at)
         VALUES ($1, $2, $3, NOW())
         ON CONFLICT (chat_id, storage_key)
         DO UPDATE SET raw_text = EXCLUDED.raw_text, updated_at = EXCLUDED.updated_at",
    )
    .bind(chat_id)
    .bind(storage_key)
    .bind(raw_text)
    .execute(pool)
    .await
    .context("Failed to save raw input")?;

    Ok(())
}

/// Load the raw text stored under `storage_key` for a chat
pub async fn load_raw_input(
    pool: &PgPool,
    chat_id: i64,
    storage_key: &str,
) -> Result<Option<StoredInput>> {
    let row = sqlx::query(
        "SELECT chat_id, storage_key, raw_text, updated_at
         FROM raw_inputs WHERE chat_id = $1 AND storage_key = $2",
    )
    .bind(chat_id)
    .bind(storage_key)
    .fetch_optional(pool)
    .await
    .context("Failed to load raw input")?;

    match row {
        Some(row) => {
            debug!(chat_id, storage_key, "Raw input found");
            Ok(Some(StoredInput {
                chat_id: row.get("chat_id"),
                storage_key: row.get("storage_key"),
                raw_text: row.get("raw_text"),
                updated_at: row.get("updated_at"),
            }))
        }
        None => {
            debug!(chat_id, storage_key, "No raw input stored");
            Ok(None)
        }
    }
}

/// Remove the stored raw text; returns whether anything was deleted
pub async fn clear_raw_input(pool: &PgPool, chat_id: i64, storage_key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM raw_inputs WHERE chat_id = $1 AND storage_key = $2")
        .bind(chat_id)
        .bind(storage_key)
        .execute(pool)
        .await
        .context("Failed to clear raw input")?;

    let deleted = result.rows_affected() > 0;
    info!(chat_id, storage_key, deleted, "Raw input cleared");
    Ok(deleted)
}
