//! Share issuing, listing and revocation handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use vault_entity::share::{FileShare, ShareLink};

use crate::dto::request::CreateShareRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::dto::validate_request;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/files/{id}/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
    Json(req): Json<CreateShareRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ShareLink>>)> {
    validate_request(&req)?;

    let days = req
        .expires_in_days
        .unwrap_or_else(|| state.share_service.default_expiry_days());
    let link = state
        .share_service
        .create_share(&auth, file_id, &req.recipient_email, days)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(link))))
}

/// GET /api/files/{id}/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<FileShare>>>> {
    let shares = state
        .share_service
        .list_shares_for_file(&auth, file_id)
        .await?;
    Ok(Json(ApiResponse::ok(shares)))
}

/// DELETE /api/shares/{id}
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.share_service.revoke_share(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Share revoked"))))
}
