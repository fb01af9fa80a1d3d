//! Share links: issuing, listing, revoking and redeeming.

pub mod access;
pub mod link;
pub mod service;

pub use access::{AccessService, SharedDownload};
pub use link::LinkService;
pub use service::ShareService;
