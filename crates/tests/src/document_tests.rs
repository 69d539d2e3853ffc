use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::UserRole;

use crate::common::{
    create_submission, create_user_with_session, get_authed, patch_json_authed, post_json_authed,
    send, test_app,
};

const BOUNDARY: &str = "estate-intake-test-boundary";

fn upload_request(id: i64, token: Option<&str>, filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/api/upload-document/{}", id))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn upload_requires_session_and_ownership() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;
    let (_, stranger) = create_user_with_session(&pool, "stranger@example.test", UserRole::Client).await;
    let (id, _) = create_submission(&app, json!({}), Some(&owner)).await;

    let (status, _) = send(&app, upload_request(id, None, "will.pdf", b"%PDF-1.4")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, response) = send(&app, upload_request(id, Some(&stranger), "will.pdf", b"%PDF-1.4")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"], "Access denied");

    let (status, response) = send(&app, upload_request(424242, Some(&owner), "will.pdf", b"%PDF-1.4")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Submission not found");
}

#[tokio::test]
async fn upload_without_storage_is_unavailable() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;
    let (id, _) = create_submission(&app, json!({}), Some(&owner)).await;

    let (status, response) = send(&app, upload_request(id, Some(&owner), "will.pdf", b"%PDF-1.4")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response["error"], "Document storage is not configured");
}

#[tokio::test]
async fn download_reports_missing_document_before_storage() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;
    let (id, _) = create_submission(&app, json!({}), Some(&owner)).await;
    let uri = format!("/api/download-document/{}", id);

    let (status, response) = get_authed(&app, &uri, &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "No document uploaded for this submission");

    let (status, _) = patch_json_authed(
        &app,
        &format!("/api/submissions/{}", id),
        &json!({ "document_key": "submissions/1/will.pdf", "document_filename": "will.pdf" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = get_authed(&app, &uri, &owner).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response["error"], "Document storage is not configured");
}

#[tokio::test]
async fn summarize_checks_access_then_document_then_services() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;
    let (_, stranger) = create_user_with_session(&pool, "stranger@example.test", UserRole::Client).await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;
    let (id, _) = create_submission(&app, json!({}), Some(&owner)).await;
    let uri = format!("/api/submissions/{}/summarize-document", id);

    let (status, _) = post_json_authed(&app, &uri, &json!({}), &stranger).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, response) = post_json_authed(&app, &uri, &json!({}), &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "No document uploaded for this submission");

    let (status, _) = patch_json_authed(
        &app,
        &format!("/api/submissions/{}", id),
        &json!({ "document_key": "submissions/1/trust.pdf" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json_authed(&app, &uri, &json!({}), &owner).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn staff_can_record_document_metadata() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;
    let (id, _) = create_submission(&app, json!({}), None).await;
    let uri = format!("/api/submissions/{}", id);

    let (status, _) = patch_json_authed(
        &app,
        &uri,
        &json!({
            "document_key": "submissions/9/will.pdf",
            "document_filename": "will.pdf",
            "document_summary": "Leaves everything to the cat."
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = get_authed(&app, &uri, &admin).await;
    assert_eq!(detail["document_key"], "submissions/9/will.pdf");
    assert_eq!(detail["document_filename"], "will.pdf");
    assert_eq!(detail["document_summary"], "Leaves everything to the cat.");

    let (status, _) = patch_json_authed(&app, &uri, &json!({ "document_summary": null }), &admin).await;
    assert_eq!(status, StatusCode::OK);
    let (_, detail) = get_authed(&app, &uri, &admin).await;
    assert_eq!(detail["document_summary"], serde_json::Value::Null);
}
