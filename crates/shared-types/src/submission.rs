use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Workflow status vocabulary accepted on submissions.
pub const SUBMISSION_STATUSES: &[&str] = &[
    "submitted",
    "under review",
    "assigned",
    "in progress",
    "completed",
];

/// Status given to every new submission.
pub const DEFAULT_SUBMISSION_STATUS: &str = "submitted";

pub fn is_valid_status(status: &str) -> bool {
    SUBMISSION_STATUSES.contains(&status)
}

/// Submission row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Submission {
    pub id: i64,
    pub user_id: Option<i64>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub relationship_to_deceased: Option<String>,
    pub decedent_first_name: Option<String>,
    pub decedent_last_name: Option<String>,
    pub decedent_date_of_death: Option<NaiveDate>,
    pub decedent_state: Option<String>,
    pub estate_value: Option<f64>,
    pub has_will: Option<bool>,
    pub has_trust: Option<bool>,
    pub has_disputes: Option<bool>,
    pub referral_type: String,
    pub status: String,
    pub attorney_id: Option<i64>,
    pub notes: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub form_data: Option<serde_json::Value>,
    pub document_key: Option<String>,
    pub document_filename: Option<String>,
    pub document_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    pub fn decedent_name(&self) -> String {
        format!(
            "{} {}",
            self.decedent_first_name.as_deref().unwrap_or_default(),
            self.decedent_last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn intake_fields(&self) -> IntakeFields {
        IntakeFields {
            contact_email: self.contact_email.clone(),
            contact_phone: self.contact_phone.clone(),
            relationship_to_deceased: self.relationship_to_deceased.clone(),
            decedent_first_name: self.decedent_first_name.clone(),
            decedent_last_name: self.decedent_last_name.clone(),
            decedent_date_of_death: self.decedent_date_of_death,
            decedent_state: self.decedent_state.clone(),
            estate_value: self.estate_value,
            has_will: self.has_will,
            has_trust: self.has_trust,
            has_disputes: self.has_disputes,
        }
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}

/// The client-facing columns of a submission, i.e. the ones that feed classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeFields {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub relationship_to_deceased: Option<String>,
    pub decedent_first_name: Option<String>,
    pub decedent_last_name: Option<String>,
    pub decedent_date_of_death: Option<NaiveDate>,
    pub decedent_state: Option<String>,
    pub estate_value: Option<f64>,
    pub has_will: Option<bool>,
    pub has_trust: Option<bool>,
    pub has_disputes: Option<bool>,
}

impl IntakeFields {
    /// Classification inputs with missing values defaulted to zero/false/empty.
    pub fn classification_inputs(&self) -> (f64, bool, bool, String) {
        (
            self.estate_value.unwrap_or(0.0),
            self.has_trust.unwrap_or(false),
            self.has_disputes.unwrap_or(false),
            self.decedent_state
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        )
    }

    /// Overwrite every field present in `patch`. A present `null` clears the
    /// column, except the date of death which only changes on a non-empty value.
    pub fn apply(&mut self, patch: &SubmissionPatch) -> Result<(), AppError> {
        fn set<T: Clone>(slot: &mut Option<T>, value: &Option<Option<T>>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        set(&mut self.contact_email, &patch.contact_email);
        set(&mut self.contact_phone, &patch.contact_phone);
        set(
            &mut self.relationship_to_deceased,
            &patch.relationship_to_deceased,
        );
        set(&mut self.decedent_first_name, &patch.decedent_first_name);
        set(&mut self.decedent_last_name, &patch.decedent_last_name);
        if let Some(Some(raw)) = &patch.decedent_date_of_death {
            if let Some(date) = parse_date_of_death(raw)? {
                self.decedent_date_of_death = Some(date);
            }
        }
        set(&mut self.decedent_state, &patch.decedent_state);
        if let Some(value) = &patch.estate_value {
            if let Some(v) = value {
                validate_estate_value(*v)?;
            }
            self.estate_value = *value;
        }
        set(&mut self.has_will, &patch.has_will);
        set(&mut self.has_trust, &patch.has_trust);
        set(&mut self.has_disputes, &patch.has_disputes);
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date. Blank input means "not provided".
pub fn parse_date_of_death(raw: &str) -> Result<Option<NaiveDate>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::bad_request("decedent_date_of_death must be in YYYY-MM-DD format"))
}

pub fn validate_estate_value(value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::bad_request(
            "estate_value must be a nonnegative amount",
        ));
    }
    Ok(())
}

/// Intake form payload. Unknown keys are kept only in the stored `form_data` blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct CreateSubmissionRequest {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub relationship_to_deceased: Option<String>,
    pub decedent_first_name: Option<String>,
    pub decedent_last_name: Option<String>,
    /// `YYYY-MM-DD`
    pub decedent_date_of_death: Option<String>,
    pub decedent_state: Option<String>,
    pub estate_value: Option<f64>,
    pub has_will: Option<bool>,
    pub has_trust: Option<bool>,
    pub has_disputes: Option<bool>,
}

impl CreateSubmissionRequest {
    pub fn into_intake_fields(self) -> Result<IntakeFields, AppError> {
        if let Some(v) = self.estate_value {
            validate_estate_value(v)?;
        }
        let decedent_date_of_death = match self.decedent_date_of_death.as_deref() {
            Some(raw) => parse_date_of_death(raw)?,
            None => None,
        };
        Ok(IntakeFields {
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            relationship_to_deceased: self.relationship_to_deceased,
            decedent_first_name: self.decedent_first_name,
            decedent_last_name: self.decedent_last_name,
            decedent_date_of_death,
            decedent_state: self.decedent_state,
            estate_value: self.estate_value,
            has_will: self.has_will,
            has_trust: self.has_trust,
            has_disputes: self.has_disputes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateSubmissionResponse {
    pub message: String,
    pub submission_id: i64,
    pub referral_type: String,
}

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Partial submission update.
///
/// Each field is `None` when the key was absent and `Some(None)` when it was
/// sent as `null`. Client-facing fields trigger the full-form path; the rest
/// are staff-only.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmissionPatch {
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub contact_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub relationship_to_deceased: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub decedent_first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub decedent_last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub decedent_date_of_death: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub decedent_state: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub estate_value: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<bool>))]
    pub has_will: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<bool>))]
    pub has_trust: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<bool>))]
    pub has_disputes: Option<Option<bool>>,

    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub attorney_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub document_key: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub document_filename: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub document_summary: Option<Option<String>>,
}

impl SubmissionPatch {
    /// True when any client-facing field is present.
    pub fn has_form_fields(&self) -> bool {
        self.contact_email.is_some()
            || self.contact_phone.is_some()
            || self.relationship_to_deceased.is_some()
            || self.decedent_first_name.is_some()
            || self.decedent_last_name.is_some()
            || self.decedent_date_of_death.is_some()
            || self.decedent_state.is_some()
            || self.estate_value.is_some()
            || self.has_will.is_some()
            || self.has_trust.is_some()
            || self.has_disputes.is_some()
    }

    /// The staff-only portion, validated. `None` when no such field is present.
    pub fn admin_update(&self) -> Option<AdminUpdate> {
        let update = AdminUpdate {
            status: self.status.clone(),
            attorney_id: self.attorney_id,
            notes: self.notes.clone(),
            document_key: self.document_key.clone(),
            document_filename: self.document_filename.clone(),
            document_summary: self.document_summary.clone(),
        };
        if update == AdminUpdate::default() {
            None
        } else {
            Some(update)
        }
    }
}

/// Staff-only columns of a submission patch, with the same absent/null encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminUpdate {
    pub status: Option<Option<String>>,
    pub attorney_id: Option<Option<i64>>,
    pub notes: Option<Option<String>>,
    pub document_key: Option<Option<String>>,
    pub document_filename: Option<Option<String>>,
    pub document_summary: Option<Option<String>>,
}

impl AdminUpdate {
    /// Status must be one of [`SUBMISSION_STATUSES`]; it cannot be cleared.
    pub fn validated_status(&self) -> Result<Option<String>, AppError> {
        match &self.status {
            None => Ok(None),
            Some(Some(s)) if is_valid_status(s) => Ok(Some(s.clone())),
            Some(_) => Err(AppError::bad_request(format!(
                "Invalid status. Must be one of: {}",
                SUBMISSION_STATUSES.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateSubmissionResponse {
    pub message: String,
    pub submission_id: i64,
    pub referral_type: String,
}

/// Row in the staff submission listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmissionSummary {
    pub id: i64,
    pub contact_email: Option<String>,
    pub decedent_name: String,
    pub decedent_state: Option<String>,
    pub estate_value: Option<f64>,
    pub referral_type: String,
    pub status: String,
    pub attorney_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Submission> for SubmissionSummary {
    fn from(s: Submission) -> Self {
        Self {
            decedent_name: s.decedent_name(),
            id: s.id,
            contact_email: s.contact_email,
            decedent_state: s.decedent_state,
            estate_value: s.estate_value,
            referral_type: s.referral_type,
            status: s.status,
            attorney_id: s.attorney_id,
            notes: s.notes,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// Row in a client's own submission listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MySubmissionSummary {
    pub id: i64,
    pub contact_email: Option<String>,
    pub decedent_name: String,
    pub decedent_state: Option<String>,
    pub estate_value: Option<f64>,
    pub referral_type: String,
    pub status: String,
    pub attorney_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Submission> for MySubmissionSummary {
    fn from(s: Submission) -> Self {
        Self {
            decedent_name: s.decedent_name(),
            id: s.id,
            contact_email: s.contact_email,
            decedent_state: s.decedent_state,
            estate_value: s.estate_value,
            referral_type: s.referral_type,
            status: s.status,
            attorney_id: s.attorney_id,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// Full submission view, including the raw form blob and document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmissionDetail {
    pub id: i64,
    pub user_id: Option<i64>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub relationship_to_deceased: Option<String>,
    pub decedent_first_name: Option<String>,
    pub decedent_last_name: Option<String>,
    pub decedent_date_of_death: Option<String>,
    pub decedent_state: Option<String>,
    pub estate_value: Option<f64>,
    pub has_will: Option<bool>,
    pub has_trust: Option<bool>,
    pub has_disputes: Option<bool>,
    pub referral_type: String,
    pub status: String,
    pub attorney_id: Option<i64>,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub form_data: Option<serde_json::Value>,
    pub document_key: Option<String>,
    pub document_filename: Option<String>,
    pub document_summary: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Submission> for SubmissionDetail {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            contact_email: s.contact_email,
            contact_phone: s.contact_phone,
            relationship_to_deceased: s.relationship_to_deceased,
            decedent_first_name: s.decedent_first_name,
            decedent_last_name: s.decedent_last_name,
            decedent_date_of_death: s
                .decedent_date_of_death
                .map(|d| d.format("%Y-%m-%d").to_string()),
            decedent_state: s.decedent_state,
            estate_value: s.estate_value,
            has_will: s.has_will,
            has_trust: s.has_trust,
            has_disputes: s.has_disputes,
            referral_type: s.referral_type,
            status: s.status,
            attorney_id: s.attorney_id,
            notes: s.notes,
            form_data: s.form_data,
            document_key: s.document_key,
            document_filename: s.document_filename,
            document_summary: s.document_summary,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}
