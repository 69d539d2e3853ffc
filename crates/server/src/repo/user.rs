use shared_types::{AppError, User, UserRole};
use sqlx::{PgConnection, Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

const USER_COLUMNS: &str = "id, email, first_name, last_name, role, created_at";

/// A user row together with its password hash. Never leaves the server.
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub password_hash: String,
}

impl UserCredentials {
    pub fn into_user(self) -> (User, String) {
        (
            User {
                id: self.id,
                email: self.email,
                first_name: self.first_name,
                last_name: self.last_name,
                role: self.role,
                created_at: self.created_at,
            },
            self.password_hash,
        )
    }
}

/// Insert a new user. The email must already be normalized.
pub async fn create(
    pool: &Pool<Postgres>,
    email: &str,
    password_hash: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    role: UserRole,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, password_hash, first_name, last_name, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn email_exists(pool: &Pool<Postgres>, email: &str) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_credentials_by_email(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<UserCredentials>, AppError> {
    sqlx::query_as::<_, UserCredentials>(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// All users, newest first.
pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<User>, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn update_role(
    pool: &Pool<Postgres>,
    id: i64,
    role: UserRole,
) -> Result<Option<User>, AppError> {
    let mut conn = pool.acquire().await.map_err(SqlxErrorExt::into_app_error)?;
    update_role_tx(&mut conn, id, role).await
}

// ── Transactional variants ──────────────────────────────────────────

/// Lock the target user together with every super admin, in id order.
///
/// Returns the target (if it exists) and the super-admin count. One ordered
/// lock set keeps concurrent role changes and deletions from deadlocking.
pub async fn lock_for_role_change_tx(
    conn: &mut PgConnection,
    id: i64,
) -> Result<(Option<User>, i64), AppError> {
    let locked = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users \
         WHERE role = 'super_admin' OR id = $1 \
         ORDER BY id FOR UPDATE"
    ))
    .bind(id)
    .fetch_all(&mut *conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(split_locked(locked, id))
}

fn split_locked(locked: Vec<User>, id: i64) -> (Option<User>, i64) {
    let super_admins = locked
        .iter()
        .filter(|u| u.user_role() == UserRole::SuperAdmin)
        .count() as i64;
    let target = locked.into_iter().find(|u| u.id == id);
    (target, super_admins)
}

pub async fn update_role_tx(
    conn: &mut PgConnection,
    id: i64,
    role: UserRole,
) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET role = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(id)
    .bind(role.as_str())
    .fetch_optional(&mut *conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Delete a user. Sessions and owned submissions go with it (FK cascade).
pub async fn delete_tx(conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}
