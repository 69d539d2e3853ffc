//! Upload and summarization pipeline for submission documents.
//!
//! Both operations are generic over the storage and completion backends so
//! they can run against in-memory fakes in tests.

use shared_types::AppError;

use crate::completion::{build_summary_prompt, Completer, SYSTEM_PROMPT};
use crate::pdf_text::{self, PdfTextError};
use crate::storage::ObjectStore;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";
const FALLBACK_FILENAME: &str = "document.pdf";

/// Accept a file when it is declared as a PDF (by content type or extension)
/// and its bytes start with the PDF header.
pub fn is_pdf(content_type: Option<&str>, filename: &str, bytes: &[u8]) -> bool {
    let declared = content_type
        .map(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
        || filename.to_ascii_lowercase().ends_with(".pdf");
    declared && bytes.starts_with(PDF_MAGIC)
}

/// Reduce a client-supplied filename to a safe key component.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// `submissions/{id}/{unix_ts}_{sanitized_name}`
pub fn document_key(submission_id: i64, unix_ts: i64, filename: &str) -> String {
    format!(
        "submissions/{}/{}_{}",
        submission_id,
        unix_ts,
        sanitize_filename(filename)
    )
}

/// Validate and store a PDF. Returns the storage key.
pub async fn store_pdf<S: ObjectStore>(
    store: &S,
    submission_id: i64,
    filename: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::bad_request("No file provided"));
    }
    if !is_pdf(content_type, filename, &bytes) {
        return Err(AppError::bad_request("Only PDF files are allowed"));
    }

    let key = document_key(submission_id, chrono::Utc::now().timestamp(), filename);
    store
        .put(&key, PDF_CONTENT_TYPE, bytes)
        .await
        .map_err(|e| {
            tracing::error!(submission_id, error = %e, "document upload failed");
            AppError::internal("Failed to store document")
        })?;

    tracing::info!(submission_id, key = %key, "document stored");
    Ok(key)
}

/// Fetch a stored PDF, extract its leading text and ask the completer for a summary.
pub async fn summarize_pdf<S: ObjectStore, C: Completer>(
    store: &S,
    completer: &C,
    key: &str,
) -> Result<String, AppError> {
    let bytes = store.get(key).await.map_err(|e| {
        tracing::error!(key, error = %e, "document fetch failed");
        AppError::internal("Failed to fetch document")
    })?;

    let text = pdf_text::extract_text(&bytes, pdf_text::MAX_PAGES).map_err(|e| match e {
        PdfTextError::Unreadable(_) => AppError::bad_request("Document is not a readable PDF"),
        PdfTextError::NoText => {
            AppError::bad_request("No text could be extracted from the document")
        }
    })?;

    let prompt = build_summary_prompt(pdf_text::truncate_chars(&text, pdf_text::MAX_CHARS));
    completer.complete(SYSTEM_PROMPT, &prompt).await.map_err(|e| {
        tracing::error!(key, error = %e, "document summarization failed");
        AppError::service_unavailable("Summarization service unavailable")
    })
}
