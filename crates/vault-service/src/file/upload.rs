//! File upload with version chain assignment.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use vault_core::config::StorageConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::BlobStore;
use vault_database::repositories::FileRepository;
use vault_entity::file::{
    CreateFile, EncryptionMethod, FileRecord, NewFileVersion, VersionPlan, format_file_size,
};

use super::key::require_encryption_key;
use crate::context::RequestContext;

const BLOB_PATH_ATTEMPTS: usize = 64;

/// A single-request upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File name, including extension.
    pub file_name: String,
    /// Client-supplied MIME type.
    pub mime_type: Option<String>,
    /// Encryption key; required but not stored.
    pub encryption_key: String,
    /// Encryption method tag.
    pub encryption_method: EncryptionMethod,
    /// File content.
    pub data: Bytes,
}

/// Stores uploaded bytes and appends them to the uploader's version chain
/// for the file name.
#[derive(Debug, Clone)]
pub struct UploadService {
    files: Arc<dyn FileRepository>,
    blobs: Arc<dyn BlobStore>,
    config: StorageConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        files: Arc<dyn FileRepository>,
        blobs: Arc<dyn BlobStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            files,
            blobs,
            config,
        }
    }

    /// Validate an upload and return the version it would currently be
    /// assigned. The actual assignment happens atomically in [`Self::upload`].
    pub async fn submit_upload(
        &self,
        owner_id: Uuid,
        file_name: &str,
        size_bytes: u64,
        mime_type: &str,
    ) -> AppResult<VersionPlan> {
        validate_file_name(file_name)?;
        self.check_size(size_bytes)?;

        let latest = self
            .files
            .find_latest_by_owner_and_name(owner_id, file_name)
            .await?;
        let plan = VersionPlan::after(latest.as_ref());

        info!(
            user_id = %owner_id,
            name = %file_name,
            size_bytes,
            mime_type,
            version = plan.version,
            is_update = plan.is_update(),
            "Upload planned"
        );
        Ok(plan)
    }

    /// Store the bytes and insert the next record of the chain.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        request: UploadRequest,
    ) -> AppResult<FileRecord> {
        require_encryption_key(&request.encryption_key)?;
        validate_file_name(&request.file_name)?;
        self.check_size(request.data.len() as u64)?;

        let mime_type = resolve_mime_type(request.mime_type.as_deref(), &request.file_name);
        let size = format_file_size(request.data.len() as u64);
        let storage_path = self
            .store_blob(ctx.user_id, &request.file_name, ctx.request_time, request.data)
            .await?;
        let data = CreateFile {
            owner_id: ctx.user_id,
            name: request.file_name,
            size,
            mime_type,
            storage_path: storage_path.clone(),
            encryption_method: request.encryption_method,
        };

        let record = match self.files.create_next_version(&data).await {
            Ok(record) => record,
            Err(e) => {
                error!(
                    user_id = %ctx.user_id,
                    path = %storage_path,
                    error = %e,
                    "File record insert failed; blob left orphaned"
                );
                return Err(e);
            }
        };

        if record.previous_version_id.is_some() {
            let version = NewFileVersion {
                file_id: record.id,
                version: record.version,
                previous_version_id: record.previous_version_id,
            };
            if let Err(e) = self.files.create_version(&version).await {
                warn!(file_id = %record.id, error = %e, "Failed to record file version");
            }
        }

        info!(
            user_id = %ctx.user_id,
            file_id = %record.id,
            name = %record.name,
            version = record.version,
            size = %record.size,
            "Upload completed"
        );

        Ok(record)
    }

    /// Write the bytes under a fresh blob path, stepping the timestamp
    /// forward while another upload of the same name holds the path.
    async fn store_blob(
        &self,
        owner_id: Uuid,
        file_name: &str,
        at: DateTime<Utc>,
        data: Bytes,
    ) -> AppResult<String> {
        let mut at = at;
        for _ in 0..BLOB_PATH_ATTEMPTS {
            let path = blob_path(owner_id, file_name, at);
            match self.blobs.put_new(&path, data.clone()).await {
                Ok(()) => return Ok(path),
                Err(e) if e.is_conflict() => at += Duration::milliseconds(1),
                Err(e) => return Err(e),
            }
        }
        Err(AppError::conflict(format!(
            "No free blob path for '{file_name}'"
        )))
    }

    fn check_size(&self, size_bytes: u64) -> AppResult<()> {
        if size_bytes > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        Ok(())
    }
}

/// Reject names that are empty or could address another path.
pub fn validate_file_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("File name is required"));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(AppError::validation(format!("Invalid file name: {name}")));
    }
    Ok(())
}

/// Blob path for an upload: `{owner_id}/{unix_millis}_{file_name}`.
pub fn blob_path(owner_id: Uuid, file_name: &str, at: DateTime<Utc>) -> String {
    format!("{owner_id}/{}_{file_name}", at.timestamp_millis())
}

/// The stored MIME type: the client's when given, else a guess from the
/// name, else the lower-cased extension, else empty.
pub fn resolve_mime_type(provided: Option<&str>, file_name: &str) -> String {
    if let Some(mime) = provided.map(str::trim).filter(|m| !m.is_empty()) {
        return mime.to_string();
    }
    if let Some(guess) = mime_guess::from_path(file_name).first() {
        return guess.essence_str().to_string();
    }
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}
