use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::extractors::AdminRequired;
use crate::error_convert::ValidateRequest;
use shared_types::{
    AppError, CreateStateLimitRequest, MessageResponse, StateLimitMutationResponse,
    StateLimitResponse, UpdateStateLimitRequest,
};

#[utoipa::path(
    get,
    path = "/api/state-limits",
    responses(
        (status = 200, description = "All limits ordered by state", body = Vec<StateLimitResponse>),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "state-limits"
)]
#[tracing::instrument(skip(pool, _auth))]
pub async fn list_state_limits(
    State(pool): State<Pool<Postgres>>,
    _auth: AdminRequired,
) -> Result<Json<Vec<StateLimitResponse>>, AppError> {
    let limits = crate::repo::state_limit::list(&pool).await?;
    Ok(Json(limits.into_iter().map(StateLimitResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/state-limits",
    request_body = CreateStateLimitRequest,
    responses(
        (status = 201, description = "Limit created", body = StateLimitMutationResponse),
        (status = 400, description = "State limit already exists", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "state-limits"
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn create_state_limit(
    State(pool): State<Pool<Postgres>>,
    auth: AdminRequired,
    Json(body): Json<CreateStateLimitRequest>,
) -> Result<(StatusCode, Json<StateLimitMutationResponse>), AppError> {
    body.validate_request()?;
    let state = body.state.trim();
    if state.is_empty() {
        return Err(AppError::bad_request("State is required"));
    }

    if crate::repo::state_limit::state_taken(&pool, state, None).await? {
        return Err(AppError::bad_request("State limit already exists"));
    }

    let limit = crate::repo::state_limit::create(&pool, state, body.limit_amount).await?;
    tracing::info!(actor_id = auth.0.id, state = %limit.state, limit_amount = limit.limit_amount, "state limit created");

    Ok((
        StatusCode::CREATED,
        Json(StateLimitMutationResponse {
            message: "State limit created successfully".to_string(),
            id: limit.id,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/state-limits/{id}",
    params(("id" = i64, Path, description = "State limit ID")),
    request_body = UpdateStateLimitRequest,
    responses(
        (status = 200, description = "Limit updated", body = StateLimitMutationResponse),
        (status = 400, description = "State name already exists", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "state-limits"
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn update_state_limit(
    State(pool): State<Pool<Postgres>>,
    auth: AdminRequired,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStateLimitRequest>,
) -> Result<Json<StateLimitMutationResponse>, AppError> {
    body.validate_request()?;
    let state = body.state.as_deref().map(str::trim);
    if state.is_some_and(str::is_empty) {
        return Err(AppError::bad_request("State is required"));
    }

    if crate::repo::state_limit::find_by_id(&pool, id).await?.is_none() {
        return Err(AppError::not_found("State limit not found"));
    }
    if let Some(state) = state {
        if crate::repo::state_limit::state_taken(&pool, state, Some(id)).await? {
            return Err(AppError::bad_request("State name already exists"));
        }
    }

    let limit = crate::repo::state_limit::update(&pool, id, state, body.limit_amount)
        .await?
        .ok_or_else(|| AppError::not_found("State limit not found"))?;
    tracing::info!(actor_id = auth.0.id, state = %limit.state, limit_amount = limit.limit_amount, "state limit updated");

    Ok(Json(StateLimitMutationResponse {
        message: "State limit updated successfully".to_string(),
        id: limit.id,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/state-limits/{id}",
    params(("id" = i64, Path, description = "State limit ID")),
    responses(
        (status = 200, description = "Limit deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "state-limits"
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn delete_state_limit(
    State(pool): State<Pool<Postgres>>,
    auth: AdminRequired,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !crate::repo::state_limit::delete(&pool, id).await? {
        return Err(AppError::not_found("State limit not found"));
    }
    tracing::info!(actor_id = auth.0.id, state_limit_id = id, "state limit deleted");

    Ok(Json(MessageResponse::new("State limit deleted successfully")))
}
