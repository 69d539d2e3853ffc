use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::{
    cookies, extractors::AuthRequired, maybe_promote_super_admin, password as pw, session,
};
use crate::error_convert::ValidateRequest;
use shared_types::{
    AppError, AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse, UserRole,
};

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Create a session row and return headers carrying its cookie.
async fn start_session(pool: &Pool<Postgres>, user_id: i64) -> Result<HeaderMap, AppError> {
    let token = session::generate_token();
    let expires_at = session::session_expires_at(chrono::Utc::now());
    crate::repo::session::create(pool, user_id, &session::hash_token(&token), expires_at).await?;

    let mut headers = HeaderMap::new();
    cookies::set_session_cookie(&mut headers, &token, session::session_expiry_hours());
    Ok(headers)
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = AuthResponse),
        (status = 400, description = "Email already registered", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, body))]
pub async fn register(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), AppError> {
    body.validate_request()?;
    let email = normalize_email(&body.email);

    if crate::repo::user::email_exists(&pool, &email).await? {
        return Err(AppError::bad_request("Email already registered"));
    }

    let password_hash =
        pw::hash_password(&body.password).map_err(|e| AppError::internal(e.to_string()))?;

    let user = crate::repo::user::create(
        &pool,
        &email,
        &password_hash,
        non_blank(body.first_name.as_deref()),
        non_blank(body.last_name.as_deref()),
        UserRole::Client,
    )
    .await?;
    let user = maybe_promote_super_admin(&pool, user).await;

    let headers = start_session(&pool, user.id).await?;
    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, body))]
pub async fn login(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    body.validate_request()?;
    let email = normalize_email(&body.email);

    let account = crate::repo::user::find_credentials_by_email(&pool, &email)
        .await?
        .map(|credentials| credentials.into_user());

    let valid = pw::verify_login(
        &body.password,
        account.as_ref().map(|(_, hash)| hash.as_str()),
    )
    .map_err(|e| AppError::internal(e.to_string()))?;
    let user = match account {
        Some((user, _)) if valid => user,
        _ => {
            tracing::info!("login rejected");
            return Err(AppError::unauthorized("Invalid email or password"));
        }
    };

    let user = maybe_promote_super_admin(&pool, user).await;
    let headers = start_session(&pool, user.id).await?;

    Ok((
        headers,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session ended", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, auth, headers))]
pub async fn logout(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<MessageResponse>), AppError> {
    if let Some(token) = cookies::extract_session_token(&headers) {
        crate::repo::session::delete_by_token_hash(&pool, &session::hash_token(&token)).await?;
    }
    tracing::info!(user_id = auth.0.id, "user logged out");

    let mut response_headers = HeaderMap::new();
    cookies::clear_session_cookie(&mut response_headers);
    Ok((response_headers, Json(MessageResponse::new("Logout successful"))))
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn me(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<UserResponse>, AppError> {
    let user = crate::repo::user::find_by_id(&pool, auth.0.id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;
    Ok(Json(UserResponse::from(user)))
}
