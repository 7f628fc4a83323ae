//! Integration tests for the durable local storage backends.
//!
//! These use REAL SQLite files in a temp directory (NOT in-memory) so that
//! reopening a store exercises the same path as an application restart.

use diary_core::LocalStorage;
use diary_storage::{MemoryLocalStorage, SqliteLocalStorage};
use tempfile::TempDir;

fn database_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("identity.db").display())
}

async fn open_store(dir: &TempDir) -> SqliteLocalStorage {
    SqliteLocalStorage::open(&database_url(dir))
        .await
        .expect("Failed to open store")
}

#[tokio::test]
async fn test_get_missing_key_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open_store(&dir).await;

    assert_eq!(storage.get_item("userMapCache").await.unwrap(), None);
}

#[tokio::test]
async fn test_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open_store(&dir).await;

    storage
        .set_item("userMapCache", r#"[["alice",{"login":"alice"}]]"#)
        .await
        .unwrap();

    let value = storage.get_item("userMapCache").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"[["alice",{"login":"alice"}]]"#));
}

#[tokio::test]
async fn test_set_overwrites_existing_value() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open_store(&dir).await;

    storage.set_item("negativeUserCache", "[]").await.unwrap();
    storage
        .set_item("negativeUserCache", r#"[["bob",1700000000000]]"#)
        .await
        .unwrap();

    let value = storage.get_item("negativeUserCache").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"[["bob",1700000000000]]"#));
    assert_eq!(storage.keys().await.unwrap(), vec!["negativeUserCache"]);
}

#[tokio::test]
async fn test_remove_item_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open_store(&dir).await;

    storage.set_item("userMapCache", "[]").await.unwrap();
    storage.remove_item("userMapCache").await.unwrap();
    storage.remove_item("userMapCache").await.unwrap();

    assert_eq!(storage.get_item("userMapCache").await.unwrap(), None);
    assert!(storage.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = open_store(&dir).await;
        storage.set_item("userMapCache", "[1]").await.unwrap();
        storage.pool().close().await;
    }

    let reopened = open_store(&dir).await;
    assert_eq!(
        reopened.get_item("userMapCache").await.unwrap().as_deref(),
        Some("[1]")
    );
}

#[tokio::test]
async fn test_keys_are_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open_store(&dir).await;

    storage.set_item("userMapCache", "[]").await.unwrap();
    storage.set_item("negativeUserCache", "[]").await.unwrap();

    assert_eq!(
        storage.keys().await.unwrap(),
        vec!["negativeUserCache", "userMapCache"]
    );
}

#[tokio::test]
async fn test_backends_behave_the_same() {
    let dir = tempfile::tempdir().unwrap();
    let backends: Vec<Box<dyn LocalStorage>> = vec![
        Box::new(open_store(&dir).await),
        Box::new(MemoryLocalStorage::new()),
    ];

    for storage in backends {
        storage.set_item("a", "1").await.unwrap();
        storage.set_item("b", "2").await.unwrap();
        storage.remove_item("a").await.unwrap();

        assert_eq!(storage.get_item("a").await.unwrap(), None);
        assert_eq!(storage.get_item("b").await.unwrap().as_deref(), Some("2"));
        assert_eq!(storage.keys().await.unwrap(), vec!["b"]);
    }
}
