//! Authentication provider interface.

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use vault_core::result::AppResult;
use vault_entity::user::{ProfileUpdate, UserProfile};

use crate::model::{AuthSession, SignUp};

/// Account and session operations used by the HTTP layer.
///
/// Every token-taking method fails with `NotAuthenticated` when the token is
/// malformed, expired, revoked, or belongs to a user that no longer exists.
#[async_trait]
pub trait AuthProvider: Send + Sync + Debug + 'static {
    /// Register a new user and sign them in.
    async fn sign_up(&self, request: SignUp) -> AppResult<AuthSession>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Revoke an access token.
    async fn sign_out(&self, token: &str) -> AppResult<()>;

    /// Resolve an access token to its user.
    async fn current_user(&self, token: &str) -> AppResult<UserProfile>;

    /// Update the profile of a user.
    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate)
    -> AppResult<UserProfile>;

    /// Profiles a user can pick share recipients from, ordered by name.
    async fn list_shareable_users(&self) -> AppResult<Vec<UserProfile>>;
}
