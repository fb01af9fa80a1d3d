//! # vault-database
//!
//! Metadata store interfaces for Vault and their two implementations:
//! PostgreSQL (sqlx) and an in-process store used for tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod provider;
pub mod repositories;

pub use connection::DatabasePool;
pub use provider::Repositories;
pub use repositories::{FileRepository, ShareRepository, UserRepository};
