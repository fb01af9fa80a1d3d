//! Downloaded file content.

use bytes::Bytes;

/// File bytes with the name and type to serve them under.
#[derive(Debug, Clone)]
pub struct FileDownload {
    /// Name for the `Content-Disposition` header.
    pub name: String,
    /// MIME type, possibly empty.
    pub mime_type: String,
    /// File content.
    pub data: Bytes,
}
