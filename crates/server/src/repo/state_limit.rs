use shared_types::{AppError, StateLimit};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

const STATE_LIMIT_COLUMNS: &str = "id, state, limit_amount, created_at, updated_at";

pub async fn create(
    pool: &Pool<Postgres>,
    state: &str,
    limit_amount: f64,
) -> Result<StateLimit, AppError> {
    sqlx::query_as::<_, StateLimit>(&format!(
        "INSERT INTO state_limits (state, limit_amount) VALUES ($1, $2)
         RETURNING {STATE_LIMIT_COLUMNS}"
    ))
    .bind(state)
    .bind(limit_amount)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// All limits ordered by state name.
pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<StateLimit>, AppError> {
    sqlx::query_as::<_, StateLimit>(&format!(
        "SELECT {STATE_LIMIT_COLUMNS} FROM state_limits ORDER BY state"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<StateLimit>, AppError> {
    sqlx::query_as::<_, StateLimit>(&format!(
        "SELECT {STATE_LIMIT_COLUMNS} FROM state_limits WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Threshold configured for an exact state name, if any.
pub async fn limit_for_state(pool: &Pool<Postgres>, state: &str) -> Result<Option<f64>, AppError> {
    sqlx::query_scalar::<_, f64>("SELECT limit_amount FROM state_limits WHERE state = $1")
        .bind(state)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// True if `state` is used by any row other than `except_id`.
pub async fn state_taken(
    pool: &Pool<Postgres>,
    state: &str,
    except_id: Option<i64>,
) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM state_limits WHERE state = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(state)
    .bind(except_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn update(
    pool: &Pool<Postgres>,
    id: i64,
    state: Option<&str>,
    limit_amount: Option<f64>,
) -> Result<Option<StateLimit>, AppError> {
    sqlx::query_as::<_, StateLimit>(&format!(
        "UPDATE state_limits SET
            state        = COALESCE($2, state),
            limit_amount = COALESCE($3, limit_amount),
            updated_at   = now()
         WHERE id = $1
         RETURNING {STATE_LIMIT_COLUMNS}"
    ))
    .bind(id)
    .bind(state)
    .bind(limit_amount)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn delete(pool: &Pool<Postgres>, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM state_limits WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}
