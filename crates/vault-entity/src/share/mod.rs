//! Share domain entities.

pub mod link;
pub mod model;
pub mod view;

pub use link::ShareLink;
pub use model::{CreateShare, FileShare};
pub use view::{ShareResolution, ShareView};
