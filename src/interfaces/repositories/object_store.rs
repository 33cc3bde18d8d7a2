use async_trait::async_trait;

use crate::errors::StorageError;

/// Blob storage holding listing images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` under `key`. Fails if the key is already taken.
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Deletes the given keys.
    async fn remove(&self, keys: &[String]) -> Result<(), StorageError>;

    /// Public URL for a key. Deterministic, no network call.
    fn public_url(&self, key: &str) -> String;

    /// Inverse of [`ObjectStore::public_url`] for URLs this store produced.
    fn key_for_url(&self, url: &str) -> Option<String>;
}
