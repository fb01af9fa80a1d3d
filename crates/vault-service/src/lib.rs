//! # vault-service
//!
//! Business logic service layer for Vault. Each service orchestrates the
//! metadata store repositories and the blob store to implement one group of
//! use cases.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time as `Arc<dyn ...>` references.

pub mod context;
pub mod file;
pub mod share;

pub use context::RequestContext;
pub use file::{FileDownload, FileService, UploadRequest, UploadService, VersionService};
pub use share::{AccessService, SharedDownload, ShareService};

#[cfg(test)]
mod test_support;
