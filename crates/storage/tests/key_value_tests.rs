//! Repository-level tests for the SQLite key-value store

use campus_config::StorageConfig;
use campus_storage::{initialize_storage, KeyValueStore, SqliteKeyValueStore};
use tempfile::TempDir;

fn storage_config(temp_dir: &TempDir) -> StorageConfig {
    StorageConfig {
        url: format!("sqlite://{}", temp_dir.path().join("kv.db").display()),
        max_connections: 2,
    }
}

async fn open_store(temp_dir: &TempDir) -> SqliteKeyValueStore {
    let pool = initialize_storage(&storage_config(temp_dir))
        .await
        .expect("storage should initialise");
    SqliteKeyValueStore::new(pool)
}

#[tokio::test]
async fn test_get_missing_key_returns_none() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir).await;

    assert!(store.get("nothing-here").await.unwrap().is_none());
}

#[tokio::test]
async fn test_multi_set_overwrites_existing_values() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir).await;

    store
        .multi_set(&[("access_token", "first".to_string()), ("user", "{}".to_string())])
        .await
        .unwrap();
    store
        .multi_set(&[("access_token", "second".to_string())])
        .await
        .unwrap();

    assert_eq!(
        store.get("access_token").await.unwrap().as_deref(),
        Some("second")
    );
    assert_eq!(store.get("user").await.unwrap().as_deref(), Some("{}"));
}

#[tokio::test]
async fn test_multi_remove_clears_every_listed_key() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir).await;

    store
        .multi_set(&[
            ("access_token", "token".to_string()),
            ("user", "{}".to_string()),
            ("unrelated", "keep".to_string()),
        ])
        .await
        .unwrap();

    store.multi_remove(&["access_token", "user"]).await.unwrap();

    assert!(store.get("access_token").await.unwrap().is_none());
    assert!(store.get("user").await.unwrap().is_none());
    assert_eq!(store.get("unrelated").await.unwrap().as_deref(), Some("keep"));

    // Removing absent keys is not an error.
    store.multi_remove(&["access_token", "user"]).await.unwrap();
}

#[tokio::test]
async fn test_values_survive_reopening_the_database() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = open_store(&temp_dir).await;
        store
            .multi_set(&[("access_token", "durable".to_string())])
            .await
            .unwrap();
        store.pool().close().await;
    }

    let reopened = open_store(&temp_dir).await;
    assert_eq!(
        reopened.get("access_token").await.unwrap().as_deref(),
        Some("durable")
    );
}

#[tokio::test]
async fn test_closed_pool_surfaces_errors() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir).await;
    store.pool().close().await;

    assert!(store.get("access_token").await.is_err());
    assert!(store
        .multi_set(&[("access_token", "x".to_string())])
        .await
        .is_err());
}
