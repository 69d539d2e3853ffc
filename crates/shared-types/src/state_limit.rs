use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-jurisdiction small-estate threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct StateLimit {
    pub id: i64,
    pub state: String,
    pub limit_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StateLimitResponse {
    pub id: i64,
    pub state: String,
    pub limit_amount: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StateLimit> for StateLimitResponse {
    fn from(l: StateLimit) -> Self {
        Self {
            id: l.id,
            state: l.state,
            limit_amount: l.limit_amount,
            created_at: l.created_at.to_rfc3339(),
            updated_at: l.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CreateStateLimitRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 50, message = "State is required"))
    )]
    pub state: String,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 0.0, message = "Limit amount must be nonnegative"))
    )]
    pub limit_amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[serde(default)]
pub struct UpdateStateLimitRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 50, message = "State is required"))
    )]
    pub state: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 0.0, message = "Limit amount must be nonnegative"))
    )]
    pub limit_amount: Option<f64>,
}

/// Response for state-limit create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StateLimitMutationResponse {
    pub message: String,
    pub id: i64,
}
