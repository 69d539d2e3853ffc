use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access tier of an account.
///
/// - `Client`: submits and edits their own intake forms.
/// - `Admin`: staff; sees every submission, manages attorneys and state limits.
/// - `SuperAdmin`: everything an admin can do, plus user-role management.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Client,
    Admin,
    SuperAdmin,
}

/// Every role value accepted by the user-management endpoint.
pub const USER_ROLES: &[&str] = &["client", "admin", "super_admin"];

impl UserRole {
    /// Numeric rank for hierarchy comparison.
    fn rank(&self) -> u8 {
        match self {
            UserRole::Client => 0,
            UserRole::Admin => 1,
            UserRole::SuperAdmin => 2,
        }
    }

    /// Returns true if this role satisfies the `required` role.
    /// The hierarchy is strict: super_admin ⊇ admin ⊇ client.
    pub fn satisfies(&self, required: &UserRole) -> bool {
        self.rank() >= required.rank()
    }

    /// Staff check: true for both admin and super_admin.
    pub fn is_admin(&self) -> bool {
        self.satisfies(&UserRole::Admin)
    }

    pub fn is_super_admin(&self) -> bool {
        *self == UserRole::SuperAdmin
    }

    /// Strict parse. Returns `None` for anything outside [`USER_ROLES`].
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "client" => Some(UserRole::Client),
            "admin" => Some(UserRole::Admin),
            "super_admin" => Some(UserRole::SuperAdmin),
            _ => None,
        }
    }

    /// Parse a stored role. Unknown values fall back to the lowest tier.
    pub fn from_str_or_default(s: &str) -> Self {
        Self::from_str_opt(s).unwrap_or_default()
    }

    /// Lowercase string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "super_admin",
        }
    }
}

/// User row from the database (credential hash excluded).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn user_role(&self) -> UserRole {
        UserRole::from_str_or_default(&self.role)
    }
}

/// Public view of a user returned by the auth and user-management endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name.unwrap_or_default(),
            last_name: u.last_name.unwrap_or_default(),
            role: u.role,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Account registration. Always creates a `client`; any role in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct RegisterRequest {
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 8, message = "Password must be at least 8 characters"))
    )]
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct LoginRequest {
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Password is required"))
    )]
    pub password: String,
}

/// Response for register/login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Change a user's role (super admin only).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateUserRoleRequest {
    #[serde(default)]
    pub role: Option<String>,
}

/// Response for a successful role change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateUserRoleResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
