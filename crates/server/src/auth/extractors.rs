use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{AppError, UserRole};

use super::session::SessionUser;

/// Extractor that requires authentication. Returns 401 if no live session.
pub struct AuthRequired(pub SessionUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor that optionally extracts the session user. Never fails.
pub struct MaybeAuth(pub Option<SessionUser>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<SessionUser>().cloned()))
    }
}

/// Extractor that requires authentication AND a minimum role.
/// Returns 401 if unauthenticated, 403 if the user's role does not satisfy the required role.
///
/// Role constants (match `UserRole` variants):
/// - 0 = Client
/// - 1 = Admin
/// - 2 = SuperAdmin
pub struct RoleRequired<const ROLE: u8>(pub SessionUser);

pub type AdminRequired = RoleRequired<1>;
pub type SuperAdminRequired = RoleRequired<2>;

impl<const ROLE: u8, S: Send + Sync> FromRequestParts<S> for RoleRequired<ROLE> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let required_role = match ROLE {
            0 => UserRole::Client,
            1 => UserRole::Admin,
            _ => UserRole::SuperAdmin,
        };

        if !user.user_role().satisfies(&required_role) {
            let message = match required_role {
                UserRole::SuperAdmin => "Super admin access required",
                UserRole::Admin => "Admin access required",
                UserRole::Client => "Access denied",
            };
            return Err(AppError::forbidden(message));
        }

        Ok(RoleRequired(user))
    }
}
