use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use sqlx::{Pool, Postgres};

use crate::auth::extractors::{AdminRequired, AuthRequired, MaybeAuth};
use crate::error_convert::SqlxErrorExt;
use crate::repo::submission::AdminChanges;
use shared_types::{
    determine_referral_type, AppError, CreateSubmissionRequest, CreateSubmissionResponse,
    IntakeFields, MySubmissionSummary, ReferralType, Submission, SubmissionDetail,
    SubmissionPatch, SubmissionSummary, UpdateSubmissionResponse,
};

/// Classify using the stored threshold for the submission's state, if any.
async fn classify(pool: &Pool<Postgres>, fields: &IntakeFields) -> Result<ReferralType, AppError> {
    let (estate_value, has_trust, has_disputes, state) = fields.classification_inputs();
    let state_limit = if state.is_empty() {
        None
    } else {
        crate::repo::state_limit::limit_for_state(pool, &state).await?
    };
    Ok(determine_referral_type(
        estate_value,
        has_trust,
        has_disputes,
        state_limit,
    ))
}

/// The raw body must be a JSON object; it is kept verbatim as `form_data`.
fn parse_object<T: serde::de::DeserializeOwned>(body: &Value) -> Result<T, AppError> {
    if !body.is_object() {
        return Err(AppError::bad_request("Request body must be a JSON object"));
    }
    serde_json::from_value(body.clone())
        .map_err(|e| AppError::bad_request(format!("Invalid submission payload: {}", e)))
}

async fn load_accessible(
    pool: &Pool<Postgres>,
    auth: &AuthRequired,
    id: i64,
) -> Result<Submission, AppError> {
    let submission = crate::repo::submission::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Submission not found"))?;
    if !auth.0.can_access(&submission) {
        return Err(AppError::forbidden("Access denied"));
    }
    Ok(submission)
}

/// POST /api/submissions
///
/// Open to anonymous visitors; a signed-in caller is recorded as the owner.
#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission created and classified", body = CreateSubmissionResponse),
        (status = 400, description = "Invalid payload", body = AppError)
    ),
    tag = "submissions"
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn create_submission(
    State(pool): State<Pool<Postgres>>,
    auth: MaybeAuth,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CreateSubmissionResponse>), AppError> {
    let request: CreateSubmissionRequest = parse_object(&body)?;
    let fields = request.into_intake_fields()?;
    let referral_type = classify(&pool, &fields).await?;

    let owner = auth.0.as_ref().map(|u| u.id);
    let submission =
        crate::repo::submission::create(&pool, owner, &fields, referral_type, &body).await?;

    tracing::info!(
        submission_id = submission.id,
        referral_type = %referral_type,
        owner = ?owner,
        "submission created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse {
            message: "Submission created successfully".to_string(),
            submission_id: submission.id,
            referral_type: submission.referral_type,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/submissions",
    responses(
        (status = 200, description = "All submissions, newest first", body = Vec<SubmissionSummary>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "submissions"
)]
#[tracing::instrument(skip(pool, _auth))]
pub async fn list_submissions(
    State(pool): State<Pool<Postgres>>,
    _auth: AdminRequired,
) -> Result<Json<Vec<SubmissionSummary>>, AppError> {
    let submissions = crate::repo::submission::list_all(&pool).await?;
    Ok(Json(
        submissions.into_iter().map(SubmissionSummary::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/my-submissions",
    responses(
        (status = 200, description = "The caller's submissions, newest first", body = Vec<MySubmissionSummary>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "submissions"
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn my_submissions(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<Vec<MySubmissionSummary>>, AppError> {
    let submissions = crate::repo::submission::list_for_user(&pool, auth.0.id).await?;
    Ok(Json(
        submissions.into_iter().map(MySubmissionSummary::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(("id" = i64, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission with form data and document metadata", body = SubmissionDetail),
        (status = 403, description = "Not the owner", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "submissions"
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn get_submission(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(id): Path<i64>,
) -> Result<Json<SubmissionDetail>, AppError> {
    let submission = load_accessible(&pool, &auth, id).await?;
    Ok(Json(SubmissionDetail::from(submission)))
}

/// PATCH /api/submissions/{id}
///
/// Client-facing fields overwrite the stored values, re-run classification and
/// replace `form_data`. Staff-only fields (status, attorney, notes, document
/// metadata) are applied whenever present. Both happen in one transaction.
#[utoipa::path(
    patch,
    path = "/api/submissions/{id}",
    params(("id" = i64, Path, description = "Submission ID")),
    request_body = SubmissionPatch,
    responses(
        (status = 200, description = "Submission updated", body = UpdateSubmissionResponse),
        (status = 400, description = "Invalid status, date, value or attorney", body = AppError),
        (status = 403, description = "Not the owner, or staff-only field", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "submissions"
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn update_submission(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<UpdateSubmissionResponse>, AppError> {
    let patch: SubmissionPatch = parse_object(&body)?;
    let existing = load_accessible(&pool, &auth, id).await?;

    let admin_changes = match patch.admin_update() {
        None => None,
        Some(_) if !auth.0.is_admin() => {
            return Err(AppError::forbidden("Admin access required"));
        }
        Some(update) => {
            let status = update.validated_status()?;
            if let Some(Some(attorney_id)) = update.attorney_id {
                if !crate::repo::attorney::exists(&pool, attorney_id).await? {
                    return Err(AppError::bad_request("Attorney not found"));
                }
            }
            Some(AdminChanges {
                status,
                attorney_id: update.attorney_id,
                notes: update.notes,
                document_key: update.document_key,
                document_filename: update.document_filename,
                document_summary: update.document_summary,
            })
        }
    };

    let intake = if patch.has_form_fields() {
        let mut fields = existing.intake_fields();
        fields.apply(&patch)?;
        let referral_type = classify(&pool, &fields).await?;
        Some((fields, referral_type))
    } else {
        None
    };

    let mut referral_type = existing.referral_type;
    if intake.is_some() || admin_changes.is_some() {
        let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

        if let Some((fields, referral)) = &intake {
            let updated =
                crate::repo::submission::update_intake_tx(&mut tx, id, fields, *referral, &body)
                    .await?
                    .ok_or_else(|| AppError::not_found("Submission not found"))?;
            referral_type = updated.referral_type;
        }
        if let Some(changes) = &admin_changes {
            let updated = crate::repo::submission::update_admin_tx(&mut tx, id, changes)
                .await?
                .ok_or_else(|| AppError::not_found("Submission not found"))?;
            referral_type = updated.referral_type;
        }

        tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    }

    tracing::info!(
        submission_id = id,
        actor_id = auth.0.id,
        form_path = intake.is_some(),
        admin_path = admin_changes.is_some(),
        referral_type = %referral_type,
        "submission updated"
    );

    Ok(Json(UpdateSubmissionResponse {
        message: "Submission updated successfully".to_string(),
        submission_id: id,
        referral_type,
    }))
}
