//! Diary identity CLI
//!
//! Wires the identity cache to a `SQLite` store and the Diary backend.

pub mod config;
pub mod error;

use crate::config::CliConfig;
use crate::error::Result;
use diary_identity::IdentityCache;
use diary_server_client::{DiaryServerClient, ServerConfig};
use diary_storage::SqliteLocalStorage;
use std::sync::Arc;

/// Open local storage, build the backend client and load the cache
pub async fn open_cache(config: &CliConfig) -> Result<IdentityCache> {
    let storage = SqliteLocalStorage::open(&config.storage.database_url).await?;
    tracing::debug!(url = %config.storage.database_url, "Local storage opened");

    let client = DiaryServerClient::new(ServerConfig {
        url: config.backend.url.clone(),
        access_token: config.backend.access_token.clone(),
    })?;

    let cache = IdentityCache::builder(Arc::new(client), Arc::new(storage))
        .policy(config.cache.policy())
        .load()
        .await;

    Ok(cache)
}
