//! `x-encryption-key` header extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the user-supplied encryption key.
pub const ENCRYPTION_KEY_HEADER: &str = "x-encryption-key";

/// The encryption key sent with a request, empty when absent. Services
/// reject an empty key.
#[derive(Debug, Clone, Default)]
pub struct EncryptionKey(pub String);

impl<S> FromRequestParts<S> for EncryptionKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(ENCRYPTION_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(EncryptionKey(key))
    }
}
