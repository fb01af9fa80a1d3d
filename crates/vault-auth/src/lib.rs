//! # vault-auth
//!
//! Authentication for Vault.
//!
//! ## Modules
//!
//! - `jwt` — access token creation, validation and revocation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `provider` — the [`AuthProvider`] interface consumed by the API
//! - `local` — [`LocalAuthProvider`], backed by the user repository

pub mod jwt;
pub mod local;
pub mod model;
pub mod password;
pub mod provider;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenBlocklist};
pub use local::LocalAuthProvider;
pub use model::{AuthSession, SignUp};
pub use password::{PasswordHasher, PasswordValidator};
pub use provider::AuthProvider;
