use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use shared_types::AppError;
use sqlx::{Pool, Postgres};

use super::cookies;
use super::session::hash_token;

/// Permissive auth middleware.
///
/// Resolves the session token (cookie, or Bearer header fallback) against the
/// `sessions` table and inserts the resulting `SessionUser` into request
/// extensions. Unknown or expired tokens are ignored. Does NOT reject
/// unauthenticated requests; the extractors decide authorization.
///
/// A presented token that cannot be checked fails the request with 503
/// rather than downgrading the caller to anonymous.
pub async fn auth_middleware(
    State(pool): State<Pool<Postgres>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = cookies::extract_session_token(req.headers()) {
        match crate::repo::session::find_user_by_token_hash(&pool, &hash_token(&token)).await {
            Ok(Some(user)) => {
                tracing::Span::current().record("user_id", user.id);
                req.extensions_mut().insert(user);
            }
            Ok(None) => {
                tracing::debug!("session token did not match a live session");
            }
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed");
                return AppError::service_unavailable("Session could not be verified")
                    .into_response();
            }
        }
    }

    next.run(req).await
}
