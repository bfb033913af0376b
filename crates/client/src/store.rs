//! Client-local key-value persistence.
//!
//! The platform key-value facility is abstracted behind [`KeyValueStore`];
//! the client ships an in-memory store (tests, ephemeral sessions) and a
//! SQLite-backed store (desktop/device persistence).

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

/// Named string slots.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write `value`, overwriting any prior value.
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Remove the slot. Removing an absent slot is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    slots: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.slots.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.slots.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.slots.lock().await.remove(key);
        Ok(())
    }
}

/// SQLite-backed store.
///
/// Single process, single writer: the pool holds one connection, which also
/// keeps `sqlite::memory:` databases coherent.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Open (creating if needed) the store at `{app_data_dir}/crewdash/client.db`.
    pub async fn open_default() -> anyhow::Result<Self> {
        let path = store_db_path()?;
        Self::connect(&format!("sqlite://{}", path.to_string_lossy())).await
    }

    /// Open a store from a SQLite URL (e.g. `sqlite::memory:`).
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid SQLite URL {url:?}"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite store at {url:?}"))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_slots (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_slots table")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM kv_slots
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to read slot {key:?}"))?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_slots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write slot {key:?}"))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM kv_slots
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to remove slot {key:?}"))?;

        Ok(())
    }
}

/// Resolve the path to the SQLite store database:
/// `{app_data_dir}/crewdash/client.db`.
fn store_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut dir = base;
    dir.push("crewdash");

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create store directory at {:?}", dir))?;

    dir.push("client.db");

    Ok(dir)
}
