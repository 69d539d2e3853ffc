use serde::{Deserialize, Serialize};

/// Lifetime of a presigned download URL, in seconds.
pub const DOWNLOAD_URL_TTL_SECS: u64 = 3600;

/// Response after a PDF has been stored against a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UploadDocumentResponse {
    pub message: String,
    pub submission_id: i64,
    pub document_key: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DownloadDocumentResponse {
    pub download_url: String,
    pub filename: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SummarizeDocumentResponse {
    pub message: String,
    pub submission_id: i64,
    pub summary: String,
}
