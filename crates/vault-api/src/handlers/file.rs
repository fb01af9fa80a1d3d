//! File upload, listing, download and version handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;

use vault_core::error::AppError;
use vault_entity::file::{EncryptionMethod, FileRecord, FileVersion, FileWithVersions};
use vault_service::{FileDownload, UploadRequest};

use crate::dto::request::UploadQuery;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, EncryptionKey};
use crate::state::AppState;

/// How a download is presented to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Displayed in the browser.
    Inline,
    /// Saved as a file.
    Attachment,
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<FileWithVersions>>>> {
    let files = state.file_service.list_files(&auth).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// POST /api/files?name=...&encryption_method=...
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UploadQuery>,
    EncryptionKey(key): EncryptionKey,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ApiResponse<FileRecord>>)> {
    let encryption_method = match query.encryption_method.as_deref() {
        Some(method) => method.parse::<EncryptionMethod>()?,
        None => EncryptionMethod::default(),
    };
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let record = state
        .upload_service
        .upload(
            &auth,
            UploadRequest {
                file_name: query.name,
                mime_type,
                encryption_key: key,
                encryption_method,
                data: body,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<FileRecord>>> {
    let file = state.file_service.get_file(&auth, id).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.file_service.delete_file(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("File deleted"))))
}

/// GET /api/files/{id}/view
pub async fn view_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    EncryptionKey(key): EncryptionKey,
) -> ApiResult<Response> {
    let download = state.file_service.view_file(&auth, id, &key).await?;
    Ok(file_response(download, Disposition::Inline)?)
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    EncryptionKey(key): EncryptionKey,
) -> ApiResult<Response> {
    let download = state.file_service.download_file(&auth, id, &key).await?;
    Ok(file_response(download, Disposition::Attachment)?)
}

/// GET /api/files/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<FileVersion>>>> {
    let versions = state.version_service.list_versions(&auth, id).await?;
    Ok(Json(ApiResponse::ok(versions)))
}

/// GET /api/files/{id}/versions/{version_id}/download
pub async fn download_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, version_id)): Path<(Uuid, Uuid)>,
    EncryptionKey(key): EncryptionKey,
) -> ApiResult<Response> {
    let download = state
        .version_service
        .download_version(&auth, id, version_id, &key)
        .await?;
    Ok(file_response(download, Disposition::Attachment)?)
}

/// Build a binary response with content type and disposition headers.
pub fn file_response(download: FileDownload, disposition: Disposition) -> Result<Response, AppError> {
    let content_type = if download.mime_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        download.mime_type
    };
    let kind = match disposition {
        Disposition::Inline => "inline",
        Disposition::Attachment => "attachment",
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("{kind}; filename=\"{}\"", header_safe_name(&download.name)),
        )
        .header(header::CONTENT_LENGTH, download.data.len())
        .body(Body::from(download.data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// File name restricted to printable ASCII without quotes or backslashes.
fn header_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}
