//! In-process implementations of the metadata store interfaces.
//!
//! State lives behind a `tokio::sync::RwLock`; every operation holds the
//! lock for its whole read-modify-write, which gives the same atomicity
//! guarantees as the PostgreSQL implementation.

pub mod file;
pub mod share;
pub mod user;

pub use file::MemoryFileRepository;
pub use share::MemoryShareRepository;
pub use user::MemoryUserRepository;
