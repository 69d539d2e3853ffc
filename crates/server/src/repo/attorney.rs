use shared_types::{
    join_specialties, AppError, Attorney, CreateAttorneyRequest, UpdateAttorneyRequest,
};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

const ATTORNEY_COLUMNS: &str =
    "id, first_name, last_name, email, phone, state, specialties, is_active, created_at";

/// Insert a new attorney row. Returns the created attorney.
pub async fn create(pool: &Pool<Postgres>, req: CreateAttorneyRequest) -> Result<Attorney, AppError> {
    sqlx::query_as::<_, Attorney>(&format!(
        "INSERT INTO attorneys (first_name, last_name, email, phone, state, specialties)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {ATTORNEY_COLUMNS}"
    ))
    .bind(req.first_name.trim())
    .bind(req.last_name.trim())
    .bind(req.email.trim())
    .bind(req.phone)
    .bind(req.state.map(|s| s.trim().to_string()))
    .bind(join_specialties(&req.specialties))
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<Attorney>, AppError> {
    sqlx::query_as::<_, Attorney>(&format!(
        "SELECT {ATTORNEY_COLUMNS} FROM attorneys WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Active attorneys, optionally restricted to one state. Specialty filtering
/// happens on the parsed list so a partial name never matches.
pub async fn list_active(
    pool: &Pool<Postgres>,
    state: Option<&str>,
    specialty: Option<&str>,
) -> Result<Vec<Attorney>, AppError> {
    let rows = sqlx::query_as::<_, Attorney>(&format!(
        "SELECT {ATTORNEY_COLUMNS} FROM attorneys
         WHERE is_active = TRUE AND ($1::TEXT IS NULL OR state = $1)
         ORDER BY last_name, first_name, id"
    ))
    .bind(state)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(match specialty {
        Some(s) => rows.into_iter().filter(|a| a.has_specialty(s)).collect(),
        None => rows,
    })
}

/// Partial update. Absent fields keep their stored value; an explicit null
/// clears `phone` or `state`.
pub async fn update(
    pool: &Pool<Postgres>,
    id: i64,
    req: UpdateAttorneyRequest,
) -> Result<Option<Attorney>, AppError> {
    let specialties = req.specialties.as_deref().map(join_specialties);
    sqlx::query_as::<_, Attorney>(&format!(
        "UPDATE attorneys SET
            first_name  = COALESCE($2, first_name),
            last_name   = COALESCE($3, last_name),
            email       = COALESCE($4, email),
            phone       = CASE WHEN $5 THEN $6 ELSE phone END,
            state       = CASE WHEN $7 THEN $8 ELSE state END,
            specialties = COALESCE($9, specialties),
            is_active   = COALESCE($10, is_active)
         WHERE id = $1
         RETURNING {ATTORNEY_COLUMNS}"
    ))
    .bind(id)
    .bind(req.first_name.map(|s| s.trim().to_string()))
    .bind(req.last_name.map(|s| s.trim().to_string()))
    .bind(req.email.map(|s| s.trim().to_string()))
    .bind(req.phone.is_some())
    .bind(req.phone.flatten())
    .bind(req.state.is_some())
    .bind(req.state.flatten().map(|s| s.trim().to_string()))
    .bind(specialties)
    .bind(req.is_active)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Delete an attorney. Submissions referencing it have `attorney_id` cleared (FK).
pub async fn delete(pool: &Pool<Postgres>, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM attorneys WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}

pub async fn exists(pool: &Pool<Postgres>, id: i64) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM attorneys WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
