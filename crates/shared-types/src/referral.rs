use serde::{Deserialize, Serialize};
use std::fmt;

/// Small-estate threshold applied when a jurisdiction has no configured limit.
///
/// Unverified against any statute; admins are expected to configure real
/// per-state values through the state-limit table.
pub const DEFAULT_STATE_LIMIT: f64 = 50_000.0;

/// Which settlement process a submission is referred to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReferralType {
    /// Small-estate affidavit.
    Affidavit,
    /// Informal probate.
    Informal,
    /// Formal (contested) probate.
    Formal,
    /// Trust administration.
    Trust,
}

impl ReferralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Affidavit => "affidavit",
            Self::Informal => "informal",
            Self::Formal => "formal",
            Self::Trust => "trust",
        }
    }
}

impl fmt::Display for ReferralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an estate.
///
/// Priority is fixed: a trust always wins, then disputes, then the value
/// check against `state_limit` (or [`DEFAULT_STATE_LIMIT`] when `None`).
/// The value comparison is strict, so an estate exactly at the limit goes
/// to informal probate.
pub fn determine_referral_type(
    estate_value: f64,
    has_trust: bool,
    has_disputes: bool,
    state_limit: Option<f64>,
) -> ReferralType {
    if has_trust {
        return ReferralType::Trust;
    }
    if has_disputes {
        return ReferralType::Formal;
    }
    let limit = state_limit.unwrap_or(DEFAULT_STATE_LIMIT);
    if estate_value < limit {
        ReferralType::Affidavit
    } else {
        ReferralType::Informal
    }
}
