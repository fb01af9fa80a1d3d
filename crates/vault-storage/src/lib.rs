//! # vault-storage
//!
//! Blob store implementations for Vault: the local filesystem and an
//! in-process map. [`build_blob_store`] picks one from configuration.

pub mod provider;
pub mod providers;

pub use provider::build_blob_store;
