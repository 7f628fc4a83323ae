//! `SQLite`-backed local storage

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use diary_core::LocalStorage;
use sqlx::SqlitePool;
use tracing::debug;

/// Local storage persisted in a `SQLite` table
///
/// Each key maps to one row; `set_item` upserts, so a write is a single
/// statement and a crash never leaves half a value behind.
#[derive(Clone)]
pub struct SqliteLocalStorage {
    pool: SqlitePool,
}

impl SqliteLocalStorage {
    /// Connect to `database_url`, creating the file if needed, and migrate
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = crate::create_pool(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        crate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing, already migrated pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        let value =
            sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Stored item");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "Removed item");
        Ok(())
    }

    async fn all_keys(&self) -> Result<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM local_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

#[async_trait]
impl LocalStorage for SqliteLocalStorage {
    async fn get_item(&self, key: &str) -> diary_core::Result<Option<String>> {
        Ok(self.read(key).await?)
    }

    async fn set_item(&self, key: &str, value: &str) -> diary_core::Result<()> {
        Ok(self.write(key, value).await?)
    }

    async fn remove_item(&self, key: &str) -> diary_core::Result<()> {
        Ok(self.remove(key).await?)
    }

    async fn keys(&self) -> diary_core::Result<Vec<String>> {
        Ok(self.all_keys().await?)
    }
}
