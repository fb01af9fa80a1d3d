//! Authentication provider backed by the Vault user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use vault_core::config::AuthConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_database::repositories::UserRepository;
use vault_entity::user::{CreateUser, ProfileUpdate, User, UserProfile};

use crate::jwt::{JwtDecoder, JwtEncoder, TokenBlocklist};
use crate::model::{AuthSession, SignUp};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::provider::AuthProvider;

/// Email/password accounts with Argon2id hashes and HS256 access tokens.
#[derive(Debug, Clone)]
pub struct LocalAuthProvider {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    blocklist: TokenBlocklist,
}

impl LocalAuthProvider {
    /// Creates a new provider.
    pub fn new(users: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        Self {
            users,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            blocklist: TokenBlocklist::new(config),
        }
    }

    fn issue_session(&self, user: &User) -> AppResult<AuthSession> {
        let (access_token, expires_at) = self.encoder.generate_access_token(user.id, &user.email)?;
        Ok(AuthSession {
            access_token,
            expires_at,
            user: user.profile(),
        })
    }
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AppError::validation("Invalid email address"));
    }
    Ok(email)
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_up(&self, request: SignUp) -> AppResult<AuthSession> {
        let email = normalize_email(&request.email)?;
        self.validator
            .validate(&request.password, &request.confirm_password)?;

        let password_hash = self.hasher.hash_password(&request.password)?;
        let full_name = request
            .full_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let user = self
            .users
            .create(&CreateUser {
                email,
                password_hash,
                full_name,
            })
            .await?;

        info!(user_id = %user.id, "User signed up");
        self.issue_session(&user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let invalid = || AppError::not_authenticated("Invalid email or password");

        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Sign-in failed: wrong password");
            return Err(invalid());
        }

        info!(user_id = %user.id, "User signed in");
        self.issue_session(&user)
    }

    async fn sign_out(&self, token: &str) -> AppResult<()> {
        let claims = self.decoder.decode(token)?;
        self.blocklist.revoke(claims.jti).await;
        info!(user_id = %claims.sub, "User signed out");
        Ok(())
    }

    async fn current_user(&self, token: &str) -> AppResult<UserProfile> {
        let claims = self.decoder.decode(token)?;
        if self.blocklist.is_revoked(&claims.jti).await {
            return Err(AppError::not_authenticated("Token has been revoked"));
        }

        self.users
            .find_by_id(claims.sub)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| AppError::not_authenticated("User no longer exists"))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> AppResult<UserProfile> {
        let user = self.users.update_profile(user_id, &update).await?;
        info!(user_id = %user.id, "Profile updated");
        Ok(user.profile())
    }

    async fn list_shareable_users(&self) -> AppResult<Vec<UserProfile>> {
        self.users.list_profiles().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::error::ErrorKind;
    use vault_database::memory::MemoryUserRepository;

    fn provider() -> LocalAuthProvider {
        LocalAuthProvider::new(
            Arc::new(MemoryUserRepository::new()),
            &AuthConfig::default(),
        )
    }

    fn sign_up(email: &str) -> SignUp {
        SignUp {
            email: email.to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
            full_name: Some("Ann Lee".to_string()),
        }
    }

    #[tokio::test]
    async fn test_sign_up_signs_in() {
        let auth = provider();
        let session = auth.sign_up(sign_up("Ann@Example.com")).await.unwrap();

        assert_eq!(session.user.email, "ann@example.com");
        let me = auth.current_user(&session.access_token).await.unwrap();
        assert_eq!(me.id, session.user.id);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_mismatch_and_duplicates() {
        let auth = provider();

        let mut mismatched = sign_up("ann@example.com");
        mismatched.confirm_password = "password124".to_string();
        let err = auth.sign_up(mismatched).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        auth.sign_up(sign_up("ann@example.com")).await.unwrap();
        let err = auth.sign_up(sign_up("ann@example.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = auth.sign_up(sign_up("not-an-email")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = provider();
        auth.sign_up(sign_up("ann@example.com")).await.unwrap();

        let err = auth
            .sign_in("ann@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthenticated);
        let err = auth
            .sign_in("nobody@example.com", "password123")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthenticated);

        let session = auth.sign_in("ann@example.com", "password123").await.unwrap();
        auth.sign_out(&session.access_token).await.unwrap();
        let err = auth.current_user(&session.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_update_profile_and_list() {
        let auth = provider();
        let session = auth.sign_up(sign_up("ann@example.com")).await.unwrap();

        let profile = auth
            .update_profile(
                session.user.id,
                ProfileUpdate {
                    full_name: Some("Ann Smith".to_string()),
                    avatar_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Ann Smith"));

        let users = auth.list_shareable_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].full_name.as_deref(), Some("Ann Smith"));
    }
}
