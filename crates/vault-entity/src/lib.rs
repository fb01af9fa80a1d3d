//! # vault-entity
//!
//! Domain entity models for Vault. Every struct in this crate represents a
//! metadata store row or a domain value object. Row types additionally
//! derive `sqlx::FromRow`.

pub mod file;
pub mod share;
pub mod user;
