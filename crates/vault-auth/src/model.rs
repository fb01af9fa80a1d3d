//! Authentication request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_entity::user::UserProfile;

/// Registration request.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
    /// Email address.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
    /// Full name (optional).
    pub full_name: Option<String>,
}

/// A signed-in session.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The signed-in user.
    pub user: UserProfile,
}
