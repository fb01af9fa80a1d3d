//! Blob store selection from configuration.

use std::sync::Arc;

use tracing::info;

use vault_core::config::StorageConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::BlobStore;

use crate::providers::{LocalBlobStore, MemoryBlobStore};

/// Build the blob store selected by `config.provider`.
pub async fn build_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    match config.provider.as_str() {
        "local" => {
            info!(root = %config.local.root_path, "Using local blob store");
            Ok(Arc::new(LocalBlobStore::new(&config.local.root_path).await?))
        }
        "memory" => {
            info!("Using in-memory blob store");
            Ok(Arc::new(MemoryBlobStore::new()))
        }
        other => Err(AppError::configuration(format!(
            "Unknown storage provider: '{other}'. Supported: local, memory"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::config::LocalStorageConfig;
    use vault_core::error::ErrorKind;

    #[tokio::test]
    async fn test_local_provider_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("blobs");
        let config = StorageConfig {
            provider: "local".to_string(),
            local: LocalStorageConfig {
                root_path: root.to_string_lossy().into_owned(),
            },
            ..StorageConfig::default()
        };

        let store = build_blob_store(&config).await.unwrap();
        assert_eq!(store.provider_type(), "local");
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let config = StorageConfig {
            provider: "s3".to_string(),
            ..StorageConfig::default()
        };
        let err = build_blob_store(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
