//! Remote API response types.

use serde::Deserialize;

/// Response from `POST /files`.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUploadResponse {
    pub urls: FileUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileUrls {
    /// Durable fetch URL for the stored file
    pub get: String,
}

/// Error body the remote service returns on rejected calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteErrorBody {
    pub detail: String,
}
