use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::{extractors::SuperAdminRequired, role_policy};
use crate::error_convert::SqlxErrorExt;
use shared_types::{
    AppError, MessageResponse, UpdateUserRoleRequest, UpdateUserRoleResponse, UserResponse,
};

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users, newest first", body = Vec<UserResponse>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Super admin access required", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(pool, _auth))]
pub async fn list_users(
    State(pool): State<Pool<Postgres>>,
    _auth: SuperAdminRequired,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = crate::repo::user::list(&pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 403, description = "Super admin access required", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(pool, _auth))]
pub async fn get_user(
    State(pool): State<Pool<Postgres>>,
    _auth: SuperAdminRequired,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = crate::repo::user::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /api/users/{id}
///
/// The target row and every super admin row are locked before the policy
/// check, so two concurrent demotions cannot both pass the last-super-admin guard.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UpdateUserRoleResponse),
        (status = 400, description = "Invalid role or last super admin", body = AppError),
        (status = 403, description = "Self-demotion or insufficient role", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn update_user_role(
    State(pool): State<Pool<Postgres>>,
    auth: SuperAdminRequired,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRoleRequest>,
) -> Result<Json<UpdateUserRoleResponse>, AppError> {
    let new_role = role_policy::parse_requested_role(body.role.as_deref())?;

    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let (target, super_admins) = crate::repo::user::lock_for_role_change_tx(&mut tx, id).await?;
    let target = target.ok_or_else(|| AppError::not_found("User not found"))?;
    role_policy::check_role_change(auth.0.id, &target, new_role, super_admins)?;

    let user = crate::repo::user::update_role_tx(&mut tx, id, new_role)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    tracing::info!(actor_id = auth.0.id, user_id = id, role = new_role.as_str(), "user role changed");
    Ok(Json(UpdateUserRoleResponse {
        message: "User role updated successfully".to_string(),
        user: UserResponse::from(user),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Last super admin", body = AppError),
        (status = 403, description = "Self-deletion or insufficient role", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn delete_user(
    State(pool): State<Pool<Postgres>>,
    auth: SuperAdminRequired,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let (target, super_admins) = crate::repo::user::lock_for_role_change_tx(&mut tx, id).await?;
    let target = target.ok_or_else(|| AppError::not_found("User not found"))?;
    role_policy::check_user_deletion(auth.0.id, &target, super_admins)?;

    if !crate::repo::user::delete_tx(&mut tx, id).await? {
        return Err(AppError::not_found("User not found"));
    }
    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    tracing::info!(actor_id = auth.0.id, user_id = id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
