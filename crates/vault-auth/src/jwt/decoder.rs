//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use vault_core::config::AuthConfig;
use vault_core::error::AppError;

use super::claims::Claims;

/// Validates HS256 access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token, checking signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::not_authenticated("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::not_authenticated("Invalid token signature")
                }
                _ => AppError::not_authenticated(format!("Token validation failed: {e}")),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use uuid::Uuid;
    use vault_core::error::ErrorKind;

    #[test]
    fn test_encode_decode() {
        let config = AuthConfig::default();
        let user_id = Uuid::new_v4();
        let (token, exp) = JwtEncoder::new(&config)
            .generate_access_token(user_id, "ann@example.com")
            .unwrap();

        let claims = JwtDecoder::new(&config).decode(&token).unwrap();
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.exp, exp.timestamp());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = AuthConfig {
            jwt_secret: "one".to_string(),
            ..AuthConfig::default()
        };
        let verifier = AuthConfig {
            jwt_secret: "two".to_string(),
            ..AuthConfig::default()
        };
        let (token, _) = JwtEncoder::new(&issuer)
            .generate_access_token(Uuid::new_v4(), "a@b.com")
            .unwrap();

        let err = JwtDecoder::new(&verifier).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthenticated);
    }

    #[test]
    fn test_garbage_rejected() {
        let err = JwtDecoder::new(&AuthConfig::default())
            .decode("not.a.jwt")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthenticated);
    }
}
