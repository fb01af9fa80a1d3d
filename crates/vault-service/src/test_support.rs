//! Service fixtures over the in-memory stores.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use vault_core::config::{ShareConfig, StorageConfig};
use vault_database::memory::{MemoryFileRepository, MemoryShareRepository};
use vault_database::repositories::{FileRepository, ShareRepository};
use vault_entity::file::{EncryptionMethod, FileRecord};
use vault_storage::providers::MemoryBlobStore;

use crate::context::RequestContext;
use crate::file::{FileService, UploadRequest, UploadService, VersionService};
use crate::share::{AccessService, ShareService};

pub(crate) struct Fixture {
    pub files: Arc<dyn FileRepository>,
    pub shares: Arc<dyn ShareRepository>,
    pub blobs: Arc<MemoryBlobStore>,
    pub uploads: UploadService,
    pub file_service: FileService,
    pub versions: VersionService,
    pub share_service: ShareService,
    pub access: AccessService,
    owner: Uuid,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_max_upload(StorageConfig::default().max_upload_size_bytes)
    }

    pub fn with_max_upload(max_upload_size_bytes: u64) -> Self {
        let files: Arc<dyn FileRepository> = Arc::new(MemoryFileRepository::new());
        let shares: Arc<dyn ShareRepository> = Arc::new(MemoryShareRepository::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let storage = StorageConfig {
            provider: "memory".to_string(),
            max_upload_size_bytes,
            ..StorageConfig::default()
        };

        Self {
            uploads: UploadService::new(files.clone(), blobs.clone(), storage),
            file_service: FileService::new(files.clone(), blobs.clone()),
            versions: VersionService::new(files.clone(), blobs.clone()),
            share_service: ShareService::new(files.clone(), shares.clone(), ShareConfig::default()),
            access: AccessService::new(files.clone(), shares.clone(), blobs.clone()),
            files,
            shares,
            blobs,
            owner: Uuid::new_v4(),
        }
    }

    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.owner, "owner@example.com")
    }

    pub fn other_context(&self) -> RequestContext {
        RequestContext::new(Uuid::new_v4(), "other@example.com")
    }

    pub async fn upload(&self, ctx: &RequestContext, name: &str, body: &'static [u8]) -> FileRecord {
        self.uploads
            .upload(
                ctx,
                UploadRequest {
                    file_name: name.to_string(),
                    mime_type: None,
                    encryption_key: "key".to_string(),
                    encryption_method: EncryptionMethod::default(),
                    data: Bytes::from_static(body),
                },
            )
            .await
            .unwrap()
    }
}
