//! File services: uploads with version chains, listing, downloads and
//! version history.

pub mod download;
pub mod key;
pub mod service;
pub mod upload;
pub mod version;

pub use download::FileDownload;
pub use service::FileService;
pub use upload::{UploadRequest, UploadService};
pub use version::VersionService;
