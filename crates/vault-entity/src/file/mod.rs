//! File domain entities.

pub mod encryption;
pub mod model;
pub mod size;
pub mod version;

pub use encryption::EncryptionMethod;
pub use model::{CreateFile, FileRecord, FileWithVersions};
pub use size::format_file_size;
pub use version::{FileVersion, NewFileVersion, VersionPlan};
