//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sign-up request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// Full name.
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
}

/// Sign-in request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Update profile request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Full name.
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    /// Avatar URL.
    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar_url: Option<String>,
}

/// Query parameters of a raw-body upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadQuery {
    /// File name, including extension.
    pub name: String,
    /// Encryption method tag; defaults to AES-256.
    pub encryption_method: Option<String>,
}

/// Create share request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareRequest {
    /// Recipient email.
    #[validate(email(message = "A valid recipient email is required"))]
    pub recipient_email: String,
    /// Days until the link expires; the configured default when omitted.
    #[validate(range(min = 1))]
    pub expires_in_days: Option<u32>,
}
