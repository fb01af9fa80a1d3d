//! File version history.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::BlobStore;
use vault_database::repositories::FileRepository;
use vault_entity::file::FileVersion;

use super::download::FileDownload;
use super::key::require_encryption_key;
use super::service::load_owned;
use crate::context::RequestContext;

/// Lists and downloads superseded versions of a file.
#[derive(Debug, Clone)]
pub struct VersionService {
    files: Arc<dyn FileRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(files: Arc<dyn FileRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { files, blobs }
    }

    /// Version rows of the file's chain, newest first.
    pub async fn list_versions(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> AppResult<Vec<FileVersion>> {
        let file = load_owned(self.files.as_ref(), ctx, file_id).await?;
        self.files.find_chain_versions(file.owner_id, &file.name).await
    }

    /// Content of the record a version row superseded, named
    /// `{base}_v{n}.{ext}` after that record's version.
    pub async fn download_version(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        version_id: Uuid,
        encryption_key: &str,
    ) -> AppResult<FileDownload> {
        require_encryption_key(encryption_key)?;
        let file = load_owned(self.files.as_ref(), ctx, file_id).await?;
        let not_found = || AppError::not_found(format!("Version {version_id} not found"));

        let version = self
            .files
            .find_version_by_id(version_id)
            .await?
            .ok_or_else(not_found)?;

        let superseding = self
            .files
            .find_by_id(version.file_id)
            .await?
            .ok_or_else(not_found)?;
        if superseding.owner_id != file.owner_id || superseding.name != file.name {
            return Err(not_found());
        }

        let previous_id = version.previous_version_id.ok_or_else(not_found)?;
        let previous = self
            .files
            .find_by_id(previous_id)
            .await?
            .filter(|p| p.owner_id == file.owner_id)
            .ok_or_else(not_found)?;

        let data = self.blobs.get(&previous.storage_path).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            version = previous.version,
            "File version downloaded"
        );

        Ok(FileDownload {
            name: previous.versioned_name(),
            mime_type: previous.mime_type,
            data,
        })
    }
}
