use std::time::Duration;

use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    types::ServerSideEncryption,
    Client,
};

/// Read an env var, trying the primary name first then a fallback.
pub fn env_or(primary: &str, fallback: &str) -> Option<String> {
    std::env::var(primary)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(fallback).ok().filter(|v| !v.is_empty()))
}

/// Bucket name for submission documents (from env or default).
fn documents_bucket() -> String {
    std::env::var("DOCUMENTS_BUCKET").unwrap_or_else(|_| "estate-documents".to_string())
}

// ── Trait ────────────────────────────────────────────────────────────

/// Object storage operations for submission documents.
#[allow(async_fn_in_trait)]
pub trait ObjectStore: Send + Sync {
    /// Generate a presigned GET URL valid for `expires_in`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, String>;

    /// Download object bytes.
    async fn get(&self, key: &str) -> Result<Vec<u8>, String>;

    /// Upload bytes with SSE-S3 encryption.
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<(), String>;
}

// ── S3 implementation ───────────────────────────────────────────────

/// S3-compatible object store. All uploads are encrypted with SSE-S3 (AES256).
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a new S3ObjectStore from environment variables.
    ///
    /// Supports both `AWS_*` and local MinIO-style `S3_*` naming:
    ///   - `AWS_ENDPOINT_URL_S3`   / `S3_ENDPOINT`
    ///   - `AWS_ACCESS_KEY_ID`     / `S3_ACCESS_KEY`
    ///   - `AWS_SECRET_ACCESS_KEY` / `S3_SECRET_KEY`
    ///   - `AWS_REGION`            / `S3_REGION`
    pub fn from_env() -> Result<Self, String> {
        let endpoint = env_or("AWS_ENDPOINT_URL_S3", "S3_ENDPOINT")
            .ok_or("AWS_ENDPOINT_URL_S3 or S3_ENDPOINT must be set")?;
        let access_key = env_or("AWS_ACCESS_KEY_ID", "S3_ACCESS_KEY")
            .ok_or("AWS_ACCESS_KEY_ID or S3_ACCESS_KEY must be set")?;
        let secret_key = env_or("AWS_SECRET_ACCESS_KEY", "S3_SECRET_KEY")
            .ok_or("AWS_SECRET_ACCESS_KEY or S3_SECRET_KEY must be set")?;
        let region =
            env_or("AWS_REGION", "S3_REGION").unwrap_or_else(|| "us-east-1".to_string());

        let creds = Credentials::new(&access_key, &secret_key, None, None, "env");

        let config = aws_sdk_s3::Config::builder()
            .endpoint_url(&endpoint)
            .region(Region::new(region))
            .credentials_provider(creds)
            .force_path_style(true)
            .behavior_version_latest()
            .build();

        Ok(Self {
            client: Client::from_conf(config),
            bucket: documents_bucket(),
        })
    }

    /// Ensure the documents bucket exists (no public-read policy).
    pub async fn ensure_bucket(&self) {
        let exists = self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok();

        if !exists {
            tracing::info!(bucket = %self.bucket, "creating documents bucket");
            match self.client.create_bucket().bucket(&self.bucket).send().await {
                Ok(_) => tracing::info!(bucket = %self.bucket, "documents bucket created"),
                Err(e) => tracing::warn!(bucket = %self.bucket, error = %e, "failed to create documents bucket"),
            }
        }
    }
}

impl ObjectStore for S3ObjectStore {
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, String> {
        let presign_config = PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|e| format!("Presign config error: {}", e))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| format!("Presign GET failed: {}", e))?;

        Ok(presigned.uri().to_string())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, String> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let svc = e.into_service_error();
                tracing::error!(key, error = ?svc, "S3 GetObject failed");
                format!("S3 download failed: {}", svc)
            })?;

        resp.body
            .collect()
            .await
            .map(|data| data.into_bytes().to_vec())
            .map_err(|e| format!("Failed to read S3 response body: {}", e))
    }

    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<(), String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .server_side_encryption(ServerSideEncryption::Aes256)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                let svc = e.into_service_error();
                tracing::error!(key, error = ?svc, "S3 PutObject failed");
                format!("S3 upload failed: {}", svc)
            })?;

        Ok(())
    }
}
