//! Custom Axum extractors.

pub mod auth;
pub mod key;

pub use auth::AuthUser;
pub use key::EncryptionKey;
