use std::time::Duration;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};

use crate::auth::extractors::AuthRequired;
use crate::db::AppState;
use crate::documents;
use crate::storage::ObjectStore;
use shared_types::{
    AppError, DownloadDocumentResponse, Submission, SummarizeDocumentResponse,
    UploadDocumentResponse, DOWNLOAD_URL_TTL_SECS,
};

const UPLOAD_FIELD: &str = "file";

async fn load_accessible(
    state: &AppState,
    auth: &AuthRequired,
    id: i64,
) -> Result<Submission, AppError> {
    let submission = crate::repo::submission::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Submission not found"))?;
    if !auth.0.can_access(&submission) {
        return Err(AppError::forbidden("Access denied"));
    }
    Ok(submission)
}

fn storage(state: &AppState) -> Result<&crate::storage::S3ObjectStore, AppError> {
    state
        .storage
        .as_deref()
        .ok_or_else(|| AppError::service_unavailable("Document storage is not configured"))
}

/// POST /api/upload-document/{id}
#[utoipa::path(
    post,
    path = "/api/upload-document/{id}",
    params(("id" = i64, Path, description = "Submission ID")),
    request_body(content_type = "multipart/form-data", description = "PDF in the `file` field"),
    responses(
        (status = 200, description = "Document stored", body = UploadDocumentResponse),
        (status = 400, description = "Missing file or not a PDF", body = AppError),
        (status = 403, description = "Not the owner", body = AppError),
        (status = 404, description = "Submission not found", body = AppError),
        (status = 503, description = "Storage not configured", body = AppError)
    ),
    tag = "documents"
)]
#[tracing::instrument(skip(state, auth, multipart))]
pub async fn upload_document(
    State(state): State<AppState>,
    auth: AuthRequired,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<UploadDocumentResponse>, AppError> {
    load_accessible(&state, &auth, id).await?;
    let store = storage(&state)?;

    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?;
        upload = Some((filename, content_type, data.to_vec()));
        break;
    }

    let (filename, content_type, bytes) =
        upload.ok_or_else(|| AppError::bad_request("No file provided"))?;

    let key =
        documents::store_pdf(store, id, &filename, content_type.as_deref(), bytes).await?;
    let original_name = if filename.trim().is_empty() {
        documents::sanitize_filename(&filename)
    } else {
        filename
    };

    crate::repo::submission::set_document(&state.pool, id, &key, &original_name)
        .await?
        .ok_or_else(|| AppError::not_found("Submission not found"))?;

    Ok(Json(UploadDocumentResponse {
        message: "Document uploaded successfully".to_string(),
        submission_id: id,
        document_key: key,
        filename: original_name,
    }))
}

/// GET /api/download-document/{id}
#[utoipa::path(
    get,
    path = "/api/download-document/{id}",
    params(("id" = i64, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Presigned download URL", body = DownloadDocumentResponse),
        (status = 403, description = "Not the owner", body = AppError),
        (status = 404, description = "No document uploaded", body = AppError),
        (status = 503, description = "Storage not configured", body = AppError)
    ),
    tag = "documents"
)]
#[tracing::instrument(skip(state, auth))]
pub async fn download_document(
    State(state): State<AppState>,
    auth: AuthRequired,
    Path(id): Path<i64>,
) -> Result<Json<DownloadDocumentResponse>, AppError> {
    let submission = load_accessible(&state, &auth, id).await?;
    let key = submission
        .document_key
        .ok_or_else(|| AppError::not_found("No document uploaded for this submission"))?;
    let store = storage(&state)?;

    let download_url = store
        .presign_get(&key, Duration::from_secs(DOWNLOAD_URL_TTL_SECS))
        .await
        .map_err(|e| {
            tracing::error!(submission_id = id, error = %e, "presign failed");
            AppError::internal("Failed to generate download URL")
        })?;

    Ok(Json(DownloadDocumentResponse {
        download_url,
        filename: submission
            .document_filename
            .unwrap_or_else(|| documents::sanitize_filename("")),
        expires_in: DOWNLOAD_URL_TTL_SECS,
    }))
}

/// POST /api/submissions/{id}/summarize-document
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/summarize-document",
    params(("id" = i64, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Summary generated and stored", body = SummarizeDocumentResponse),
        (status = 400, description = "Document has no extractable text", body = AppError),
        (status = 403, description = "Not the owner", body = AppError),
        (status = 404, description = "No document uploaded", body = AppError),
        (status = 503, description = "Storage or summarizer unavailable", body = AppError)
    ),
    tag = "documents"
)]
#[tracing::instrument(skip(state, auth))]
pub async fn summarize_document(
    State(state): State<AppState>,
    auth: AuthRequired,
    Path(id): Path<i64>,
) -> Result<Json<SummarizeDocumentResponse>, AppError> {
    let submission = load_accessible(&state, &auth, id).await?;
    let key = submission
        .document_key
        .ok_or_else(|| AppError::not_found("No document uploaded for this submission"))?;
    let store = storage(&state)?;
    let completer = state
        .completion
        .as_deref()
        .ok_or_else(|| AppError::service_unavailable("Document summarization is not configured"))?;

    let summary = documents::summarize_pdf(store, completer, &key).await?;

    crate::repo::submission::set_summary(&state.pool, id, &summary)
        .await?
        .ok_or_else(|| AppError::not_found("Submission not found"))?;
    tracing::info!(submission_id = id, chars = summary.len(), "document summarized");

    Ok(Json(SummarizeDocumentResponse {
        message: "Document summarized successfully".to_string(),
        submission_id: id,
        summary,
    }))
}
