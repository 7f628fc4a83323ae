//! Durable key/value storage trait

use crate::error::Result;
use async_trait::async_trait;

/// Durable string key/value storage
///
/// Modeled after browser local storage: whole values are written and read
/// under a fixed key. Implementations must make a completed `set_item`
/// visible to every later `get_item`, including across process restarts for
/// durable backends.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// List all stored keys
    async fn keys(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: LocalStorage + ?Sized> LocalStorage for std::sync::Arc<T> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        (**self).keys().await
    }
}
