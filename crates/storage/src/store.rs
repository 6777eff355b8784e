//! Key-value storage abstraction

use crate::errors::StorageResult;

/// Durable string key-value storage with grouped writes.
///
/// `multi_set` and `multi_remove` apply to every listed key or to none of
/// them.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;
    async fn multi_set(&self, entries: &[(&str, String)]) -> StorageResult<()>;
    async fn multi_remove(&self, keys: &[&str]) -> StorageResult<()>;
}

impl<S: KeyValueStore> KeyValueStore for &S {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key).await
    }

    async fn multi_set(&self, entries: &[(&str, String)]) -> StorageResult<()> {
        (**self).multi_set(entries).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> StorageResult<()> {
        (**self).multi_remove(keys).await
    }
}
