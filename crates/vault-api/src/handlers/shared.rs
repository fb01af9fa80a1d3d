//! Public share redemption handlers. No authentication required.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use vault_core::error::AppError;
use vault_entity::share::ShareResolution;
use vault_service::SharedDownload;

use crate::dto::response::ApiResponse;
use crate::error::{ApiResult, share_expired};
use crate::extractors::EncryptionKey;
use crate::handlers::file::{Disposition, file_response};
use crate::state::AppState;

/// GET /shared/{token}
pub async fn resolve_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Response> {
    match state.access_service.resolve_share(&token).await? {
        ShareResolution::Available(view) => Ok(Json(ApiResponse::ok(view)).into_response()),
        ShareResolution::Expired { expires_at } => Ok(share_expired(expires_at)),
        ShareResolution::NotFound => Err(AppError::not_found("Share not found").into()),
    }
}

/// GET /shared/{token}/download
pub async fn download_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
    EncryptionKey(key): EncryptionKey,
) -> ApiResult<Response> {
    match state.access_service.download_shared(&token, &key).await? {
        SharedDownload::Ready(download) => Ok(file_response(download, Disposition::Attachment)?),
        SharedDownload::Expired { expires_at } => Ok(share_expired(expires_at)),
        SharedDownload::NotFound => Err(AppError::not_found("Share not found").into()),
    }
}
