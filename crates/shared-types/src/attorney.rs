use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attorney row from the database. `specialties` is stored comma-joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Attorney {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub state: Option<String>,
    pub specialties: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Attorney {
    /// Split the stored comma-joined list, dropping empty entries.
    pub fn specialty_list(&self) -> Vec<String> {
        split_specialties(&self.specialties)
    }

    pub fn has_specialty(&self, specialty: &str) -> bool {
        self.specialty_list().iter().any(|s| s == specialty)
    }
}

pub fn split_specialties(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_specialties(list: &[String]) -> String {
    list.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// API response shape for an attorney.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AttorneyResponse {
    pub id: i64,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub state: Option<String>,
    pub specialties: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Attorney> for AttorneyResponse {
    fn from(a: Attorney) -> Self {
        let specialties = a.specialty_list();
        Self {
            id: a.id,
            name: format!("{} {}", a.first_name, a.last_name),
            first_name: a.first_name,
            last_name: a.last_name,
            email: a.email,
            phone: a.phone,
            state: a.state,
            specialties,
            is_active: a.is_active,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Request to create a new attorney.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CreateAttorneyRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "First name is required"))
    )]
    pub first_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Last name is required"))
    )]
    pub last_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
}

/// Partial attorney update. Absent fields are left unchanged; `phone` and
/// `state` may be sent as `null` to clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct UpdateAttorneyRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `null` clears the stored phone.
    #[serde(
        deserialize_with = "crate::submission::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub phone: Option<Option<String>>,
    /// `null` clears the stored state.
    #[serde(
        deserialize_with = "crate::submission::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub state: Option<Option<String>>,
    pub specialties: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Query parameters for the attorney roster.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct AttorneyListParams {
    pub specialty: Option<String>,
    pub state: Option<String>,
}

/// Response for attorney creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateAttorneyResponse {
    pub message: String,
    pub attorney_id: i64,
}
