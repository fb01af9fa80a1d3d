//! Core traits defined in `vault-core` and implemented by other crates.

pub mod storage;

pub use storage::BlobStore;
