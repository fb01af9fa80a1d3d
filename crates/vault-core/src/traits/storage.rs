//! Blob store trait for pluggable binary object storage.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for blob storage backends keyed by opaque path strings.
///
/// Implementations exist for the local filesystem and for memory. The
/// [`BlobStore`] trait is defined here in `vault-core` and implemented in
/// `vault-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store bytes at the given path, replacing anything already there.
    async fn put(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Store bytes at the given path only if nothing is there yet. An
    /// occupied path yields `Conflict` and leaves the existing object as is.
    async fn put_new(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Read the object at the given path. Missing objects yield `NotFound`.
    async fn get(&self, path: &str) -> AppResult<Bytes>;

    /// Delete the object at the given path. Missing objects yield `NotFound`.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether an object exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
