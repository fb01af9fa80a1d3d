//! PostgreSQL implementations of the metadata store interfaces.

pub mod file;
pub mod share;
pub mod user;

pub use file::PgFileRepository;
pub use share::PgShareRepository;
pub use user::PgUserRepository;

use vault_core::error::{AppError, ErrorKind};

/// Convert a sqlx error, mapping unique violations to `Conflict`.
pub(crate) fn map_db_error(context: &str, err: sqlx::Error) -> AppError {
    let is_unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    let kind = if is_unique {
        ErrorKind::Conflict
    } else {
        ErrorKind::Database
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}
