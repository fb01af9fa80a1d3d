//! In-process blob store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::BlobStore;

/// Blob store keeping every object in a map. Used by tests and the
/// development configuration.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.objects.write().await.insert(path.to_string(), data);
        Ok(())
    }

    async fn put_new(&self, path: &str, data: Bytes) -> AppResult<()> {
        match self.objects.write().await.entry(path.to_string()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!("Blob already exists: {path}"))),
            Entry::Vacant(slot) => {
                slot.insert(data);
                Ok(())
            }
        }
    }

    async fn get(&self, path: &str) -> AppResult<Bytes> {
        self.objects
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.read().await.contains_key(path))
    }
}
