pub mod cookies;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod role_policy;
pub mod session;

use shared_types::{User, UserRole};
use sqlx::{Pool, Postgres};

/// Check if the given email matches the `SUPER_ADMIN_EMAIL` env var (case-insensitive).
/// Returns `false` if the env var is empty or unset.
pub fn is_super_admin_email(email: &str) -> bool {
    match std::env::var("SUPER_ADMIN_EMAIL") {
        Ok(configured) => matches_configured_email(&configured, email),
        Err(_) => false,
    }
}

fn matches_configured_email(configured: &str, email: &str) -> bool {
    let configured = configured.trim();
    !configured.is_empty() && configured.eq_ignore_ascii_case(email.trim())
}

/// If the email matches `SUPER_ADMIN_EMAIL`, promote the user to super_admin.
/// Returns the (possibly updated) user. DB errors are non-fatal: the user is
/// returned unchanged on failure.
pub async fn maybe_promote_super_admin(pool: &Pool<Postgres>, user: User) -> User {
    if !is_super_admin_email(&user.email) || user.user_role().is_super_admin() {
        return user;
    }

    match crate::repo::user::update_role(pool, user.id, UserRole::SuperAdmin).await {
        Ok(Some(promoted)) => {
            tracing::info!(
                user_id = promoted.id,
                email = %promoted.email,
                "promoted user to super_admin via SUPER_ADMIN_EMAIL"
            );
            promoted
        }
        Ok(None) => user,
        Err(e) => {
            tracing::error!(user_id = user.id, error = %e, "failed to promote super admin");
            user
        }
    }
}
