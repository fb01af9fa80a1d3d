//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header, resolves it through the auth provider, and injects context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use vault_core::error::AppError;
use vault_entity::user::UserProfile;
use vault_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Request context passed to services.
    pub context: RequestContext,
    /// The signed-in user's profile.
    pub profile: UserProfile,
    /// The raw bearer token, needed for sign-out.
    pub token: String,
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();
        let profile = state.auth.current_user(&token).await?;
        let context = RequestContext::new(profile.id, profile.email.clone());

        Ok(AuthUser {
            context,
            profile,
            token,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::not_authenticated("Invalid Authorization header format"))
}
