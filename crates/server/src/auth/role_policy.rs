//! Guards on user-management operations. Callers count super admins inside
//! the same transaction that applies the change.

use shared_types::{AppError, User, UserRole, USER_ROLES};

/// Parse the requested role, rejecting anything outside the vocabulary.
pub fn parse_requested_role(role: Option<&str>) -> Result<UserRole, AppError> {
    role.and_then(UserRole::from_str_opt).ok_or_else(|| {
        AppError::bad_request(format!(
            "Invalid role. Must be one of: {}",
            USER_ROLES.join(", ")
        ))
    })
}

pub fn check_role_change(
    actor_id: i64,
    target: &User,
    new_role: UserRole,
    super_admin_count: i64,
) -> Result<(), AppError> {
    let demoting = target.user_role().is_super_admin() && !new_role.is_super_admin();

    if target.id == actor_id && demoting {
        return Err(AppError::forbidden("Cannot change your own super admin role"));
    }
    if demoting && super_admin_count <= 1 {
        return Err(AppError::bad_request("Cannot demote the last super admin"));
    }
    Ok(())
}

pub fn check_user_deletion(
    actor_id: i64,
    target: &User,
    super_admin_count: i64,
) -> Result<(), AppError> {
    if target.id == actor_id {
        return Err(AppError::forbidden("Cannot delete your own account"));
    }
    if target.user_role().is_super_admin() && super_admin_count <= 1 {
        return Err(AppError::bad_request("Cannot delete the last super admin"));
    }
    Ok(())
}
