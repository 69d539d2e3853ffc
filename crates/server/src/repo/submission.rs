use shared_types::{AppError, IntakeFields, ReferralType, Submission};
use sqlx::{PgConnection, Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

const SUBMISSION_COLUMNS: &str = "id, user_id, contact_email, contact_phone, relationship_to_deceased, \
    decedent_first_name, decedent_last_name, decedent_date_of_death, decedent_state, \
    estate_value, has_will, has_trust, has_disputes, referral_type, status, attorney_id, \
    notes, form_data, document_key, document_filename, document_summary, created_at, updated_at";

/// Staff-only column changes, already validated. `None` leaves a column alone.
#[derive(Debug, Default)]
pub struct AdminChanges {
    pub status: Option<String>,
    pub attorney_id: Option<Option<i64>>,
    pub notes: Option<Option<String>>,
    pub document_key: Option<Option<String>>,
    pub document_filename: Option<Option<String>>,
    pub document_summary: Option<Option<String>>,
}

pub async fn create(
    pool: &Pool<Postgres>,
    user_id: Option<i64>,
    fields: &IntakeFields,
    referral_type: ReferralType,
    form_data: &serde_json::Value,
) -> Result<Submission, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            user_id, contact_email, contact_phone, relationship_to_deceased,
            decedent_first_name, decedent_last_name, decedent_date_of_death, decedent_state,
            estate_value, has_will, has_trust, has_disputes, referral_type, form_data
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING {SUBMISSION_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&fields.contact_email)
    .bind(&fields.contact_phone)
    .bind(&fields.relationship_to_deceased)
    .bind(&fields.decedent_first_name)
    .bind(&fields.decedent_last_name)
    .bind(fields.decedent_date_of_death)
    .bind(&fields.decedent_state)
    .bind(fields.estate_value)
    .bind(fields.has_will)
    .bind(fields.has_trust)
    .bind(fields.has_disputes)
    .bind(referral_type.as_str())
    .bind(form_data)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Every submission, newest first.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_for_user(pool: &Pool<Postgres>, user_id: i64) -> Result<Vec<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE user_id = $1
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Overwrite the client-facing columns, the derived referral type and the form blob.
pub async fn update_intake_tx(
    conn: &mut PgConnection,
    id: i64,
    fields: &IntakeFields,
    referral_type: ReferralType,
    form_data: &serde_json::Value,
) -> Result<Option<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET
            contact_email            = $2,
            contact_phone            = $3,
            relationship_to_deceased = $4,
            decedent_first_name      = $5,
            decedent_last_name       = $6,
            decedent_date_of_death   = $7,
            decedent_state           = $8,
            estate_value             = $9,
            has_will                 = $10,
            has_trust                = $11,
            has_disputes             = $12,
            referral_type            = $13,
            form_data                = $14,
            updated_at               = now()
         WHERE id = $1
         RETURNING {SUBMISSION_COLUMNS}"
    ))
    .bind(id)
    .bind(&fields.contact_email)
    .bind(&fields.contact_phone)
    .bind(&fields.relationship_to_deceased)
    .bind(&fields.decedent_first_name)
    .bind(&fields.decedent_last_name)
    .bind(fields.decedent_date_of_death)
    .bind(&fields.decedent_state)
    .bind(fields.estate_value)
    .bind(fields.has_will)
    .bind(fields.has_trust)
    .bind(fields.has_disputes)
    .bind(referral_type.as_str())
    .bind(form_data)
    .fetch_optional(&mut *conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Apply staff-only changes. Each column changes only when its flag is set.
pub async fn update_admin_tx(
    conn: &mut PgConnection,
    id: i64,
    changes: &AdminChanges,
) -> Result<Option<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET
            status            = CASE WHEN $2  THEN $3  ELSE status END,
            attorney_id       = CASE WHEN $4  THEN $5  ELSE attorney_id END,
            notes             = CASE WHEN $6  THEN $7  ELSE notes END,
            document_key      = CASE WHEN $8  THEN $9  ELSE document_key END,
            document_filename = CASE WHEN $10 THEN $11 ELSE document_filename END,
            document_summary  = CASE WHEN $12 THEN $13 ELSE document_summary END,
            updated_at        = now()
         WHERE id = $1
         RETURNING {SUBMISSION_COLUMNS}"
    ))
    .bind(id)
    .bind(changes.status.is_some())
    .bind(changes.status.as_deref())
    .bind(changes.attorney_id.is_some())
    .bind(changes.attorney_id.flatten())
    .bind(changes.notes.is_some())
    .bind(changes.notes.clone().flatten())
    .bind(changes.document_key.is_some())
    .bind(changes.document_key.clone().flatten())
    .bind(changes.document_filename.is_some())
    .bind(changes.document_filename.clone().flatten())
    .bind(changes.document_summary.is_some())
    .bind(changes.document_summary.clone().flatten())
    .fetch_optional(&mut *conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Record an uploaded document. Clears any summary of the previous file.
pub async fn set_document(
    pool: &Pool<Postgres>,
    id: i64,
    key: &str,
    filename: &str,
) -> Result<Option<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET
            document_key = $2, document_filename = $3, document_summary = NULL, updated_at = now()
         WHERE id = $1
         RETURNING {SUBMISSION_COLUMNS}"
    ))
    .bind(id)
    .bind(key)
    .bind(filename)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn set_summary(
    pool: &Pool<Postgres>,
    id: i64,
    summary: &str,
) -> Result<Option<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET document_summary = $2, updated_at = now()
         WHERE id = $1
         RETURNING {SUBMISSION_COLUMNS}"
    ))
    .bind(id)
    .bind(summary)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
