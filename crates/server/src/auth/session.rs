use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use shared_types::{Submission, UserRole};

/// Identity resolved from a live session, inserted into request extensions
/// by the auth middleware.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
}

impl SessionUser {
    pub fn user_role(&self) -> UserRole {
        UserRole::from_str_or_default(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.user_role().is_admin()
    }

    /// Owners and staff may read or modify a submission.
    pub fn can_access(&self, submission: &Submission) -> bool {
        self.is_admin() || submission.is_owned_by(self.id)
    }
}

/// Generate a new random session token (32 bytes, hex-encoded).
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hash of a raw token. Only the hash is stored.
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Session lifetime from `SESSION_EXPIRY_HOURS` (default one week).
pub fn session_expiry_hours() -> i64 {
    crate::config::env_parse("SESSION_EXPIRY_HOURS", 168_i64).max(1)
}

pub fn session_expires_at(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(session_expiry_hours())
}
