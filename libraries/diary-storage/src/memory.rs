//! In-memory local storage

use async_trait::async_trait;
use diary_core::{LocalStorage, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local storage with the same semantics as the durable backends
///
/// Nothing survives the process; useful for tests, tools, and running the
/// cache without a database.
#[derive(Debug, Default)]
pub struct MemoryLocalStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryLocalStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl LocalStorage for MemoryLocalStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.items.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let storage = MemoryLocalStorage::new();
        assert!(storage.is_empty().await);

        storage.set_item("k", "v1").await.unwrap();
        storage.set_item("k", "v2").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.len().await, 1);

        storage.remove_item("k").await.unwrap();
        storage.remove_item("k").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let storage = MemoryLocalStorage::new();
        storage.set_item("negativeUserCache", "[]").await.unwrap();
        storage.set_item("userMapCache", "[]").await.unwrap();
        storage.set_item("jwt", "token").await.unwrap();

        assert_eq!(
            storage.keys().await.unwrap(),
            vec!["jwt", "negativeUserCache", "userMapCache"]
        );
    }
}
