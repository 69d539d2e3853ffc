use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::extractors::AdminRequired;
use crate::error_convert::ValidateRequest;
use shared_types::{
    AppError, AttorneyListParams, AttorneyResponse, CreateAttorneyRequest, CreateAttorneyResponse,
    MessageResponse, UpdateAttorneyRequest,
};

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// GET /api/attorneys
#[utoipa::path(
    get,
    path = "/api/attorneys",
    params(AttorneyListParams),
    responses(
        (status = 200, description = "Active attorneys", body = Vec<AttorneyResponse>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "attorneys"
)]
#[tracing::instrument(skip(pool, _auth))]
pub async fn list_attorneys(
    State(pool): State<Pool<Postgres>>,
    _auth: AdminRequired,
    Query(params): Query<AttorneyListParams>,
) -> Result<Json<Vec<AttorneyResponse>>, AppError> {
    let state = trimmed(params.state);
    let specialty = trimmed(params.specialty);

    let attorneys =
        crate::repo::attorney::list_active(&pool, state.as_deref(), specialty.as_deref()).await?;

    Ok(Json(attorneys.into_iter().map(AttorneyResponse::from).collect()))
}

/// POST /api/attorneys
#[utoipa::path(
    post,
    path = "/api/attorneys",
    request_body = CreateAttorneyRequest,
    responses(
        (status = 201, description = "Attorney created", body = CreateAttorneyResponse),
        (status = 403, description = "Admin access required", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "attorneys"
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn create_attorney(
    State(pool): State<Pool<Postgres>>,
    auth: AdminRequired,
    Json(body): Json<CreateAttorneyRequest>,
) -> Result<(StatusCode, Json<CreateAttorneyResponse>), AppError> {
    body.validate_request()?;

    let attorney = crate::repo::attorney::create(&pool, body).await?;
    tracing::info!(actor_id = auth.0.id, attorney_id = attorney.id, "attorney created");

    Ok((
        StatusCode::CREATED,
        Json(CreateAttorneyResponse {
            message: "Attorney created successfully".to_string(),
            attorney_id: attorney.id,
        }),
    ))
}

/// GET /api/attorneys/{id}
#[utoipa::path(
    get,
    path = "/api/attorneys/{id}",
    params(("id" = i64, Path, description = "Attorney ID")),
    responses(
        (status = 200, description = "Attorney found", body = AttorneyResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "attorneys"
)]
#[tracing::instrument(skip(pool, _auth))]
pub async fn get_attorney(
    State(pool): State<Pool<Postgres>>,
    _auth: AdminRequired,
    Path(id): Path<i64>,
) -> Result<Json<AttorneyResponse>, AppError> {
    let attorney = crate::repo::attorney::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Attorney {} not found", id)))?;

    Ok(Json(AttorneyResponse::from(attorney)))
}

/// PATCH /api/attorneys/{id}
#[utoipa::path(
    patch,
    path = "/api/attorneys/{id}",
    params(("id" = i64, Path, description = "Attorney ID")),
    request_body = UpdateAttorneyRequest,
    responses(
        (status = 200, description = "Attorney updated", body = AttorneyResponse),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "attorneys"
)]
#[tracing::instrument(skip(pool, _auth, body))]
pub async fn update_attorney(
    State(pool): State<Pool<Postgres>>,
    _auth: AdminRequired,
    Path(id): Path<i64>,
    Json(body): Json<UpdateAttorneyRequest>,
) -> Result<Json<AttorneyResponse>, AppError> {
    for (field, value) in [
        ("first_name", &body.first_name),
        ("last_name", &body.last_name),
        ("email", &body.email),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(AppError::bad_request(format!("{} cannot be empty", field)));
        }
    }

    let attorney = crate::repo::attorney::update(&pool, id, body)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Attorney {} not found", id)))?;

    Ok(Json(AttorneyResponse::from(attorney)))
}

/// DELETE /api/attorneys/{id}
#[utoipa::path(
    delete,
    path = "/api/attorneys/{id}",
    params(("id" = i64, Path, description = "Attorney ID")),
    responses(
        (status = 200, description = "Attorney deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "attorneys"
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn delete_attorney(
    State(pool): State<Pool<Postgres>>,
    auth: AdminRequired,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !crate::repo::attorney::delete(&pool, id).await? {
        return Err(AppError::not_found(format!("Attorney {} not found", id)));
    }
    tracing::info!(actor_id = auth.0.id, attorney_id = id, "attorney deleted");

    Ok(Json(MessageResponse::new("Attorney deleted successfully")))
}
