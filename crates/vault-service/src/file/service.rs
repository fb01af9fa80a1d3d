//! File listing, viewing, downloading and deletion.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::BlobStore;
use vault_database::repositories::FileRepository;
use vault_entity::file::{FileRecord, FileWithVersions};

use super::download::FileDownload;
use super::key::require_encryption_key;
use crate::context::RequestContext;

/// Operations on the caller's current files.
#[derive(Debug, Clone)]
pub struct FileService {
    files: Arc<dyn FileRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(files: Arc<dyn FileRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { files, blobs }
    }

    /// The caller's current files, newest first, with their version history.
    pub async fn list_files(&self, ctx: &RequestContext) -> AppResult<Vec<FileWithVersions>> {
        let current = self.files.find_current_by_owner(ctx.user_id).await?;

        let mut listing = Vec::with_capacity(current.len());
        for file in current {
            let versions = self
                .files
                .find_chain_versions(file.owner_id, &file.name)
                .await?;
            listing.push(FileWithVersions { file, versions });
        }
        Ok(listing)
    }

    /// Metadata of a file owned by the caller.
    pub async fn get_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<FileRecord> {
        load_owned(self.files.as_ref(), ctx, file_id).await
    }

    /// File content for inline display.
    pub async fn view_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        encryption_key: &str,
    ) -> AppResult<FileDownload> {
        require_encryption_key(encryption_key)?;
        let file = load_owned(self.files.as_ref(), ctx, file_id).await?;
        let data = self.blobs.get(&file.storage_path).await?;

        Ok(FileDownload {
            name: file.name,
            mime_type: file.mime_type,
            data,
        })
    }

    /// File content as an attachment.
    pub async fn download_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        encryption_key: &str,
    ) -> AppResult<FileDownload> {
        let download = self.view_file(ctx, file_id, encryption_key).await?;
        info!(user_id = %ctx.user_id, file_id = %file_id, "File downloaded");
        Ok(download)
    }

    /// Delete the blob, then the record.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<()> {
        let file = load_owned(self.files.as_ref(), ctx, file_id).await?;

        match self.blobs.delete(&file.storage_path).await {
            Ok(()) => {}
            Err(e) if e.kind == ErrorKind::NotFound => {
                warn!(file_id = %file.id, path = %file.storage_path, "Blob already missing");
            }
            Err(e) => return Err(e),
        }

        self.files.delete(file.id).await?;

        info!(user_id = %ctx.user_id, file_id = %file.id, name = %file.name, "File deleted");
        Ok(())
    }
}

/// Load a file record, hiding records owned by someone else.
pub(crate) async fn load_owned(
    files: &dyn FileRepository,
    ctx: &RequestContext,
    file_id: Uuid,
) -> AppResult<FileRecord> {
    files
        .find_by_id(file_id)
        .await?
        .filter(|f| f.owner_id == ctx.user_id)
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
}
