//! Auth handlers: sign-up, sign-in, sign-out, profile and user listing.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use vault_auth::{AuthSession, SignUp};
use vault_entity::user::{ProfileUpdate, UserProfile};

use crate::dto::request::{SignInRequest, SignUpRequest, UpdateProfileRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::dto::validate_request;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthSession>>)> {
    validate_request(&req)?;

    let session = state
        .auth
        .sign_up(SignUp {
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            full_name: req.full_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session))))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<Json<ApiResponse<AuthSession>>> {
    validate_request(&req)?;
    let session = state.auth.sign_in(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.auth.sign_out(&auth.token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Signed out successfully",
    ))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserProfile>> {
    Json(ApiResponse::ok(auth.profile))
}

/// PUT /api/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    validate_request(&req)?;

    let profile = state
        .auth
        .update_profile(
            auth.user_id,
            ProfileUpdate {
                full_name: req.full_name,
                avatar_url: req.avatar_url,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(profile)))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<UserProfile>>>> {
    let users = state.auth.list_shareable_users().await?;
    Ok(Json(ApiResponse::ok(users)))
}
