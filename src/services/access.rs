//! Authorization policy shared by every mutating operation on leaves,
//! availability and needs.

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::auth::Claims;

pub fn ensure_admin(claims: &Claims) -> AppResult<()> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "Admin access required".to_string(),
        ))
    }
}

/// The owner of a record, or any admin, may act on it.
pub fn ensure_owner_or_admin(claims: &Claims, owner_id: Uuid) -> AppResult<()> {
    if claims.is_admin() || claims.user_id() == owner_id {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "Not allowed to modify this record".to_string(),
        ))
    }
}

/// Whose record a create call targets. Admins must name the user; everyone
/// else acts for themselves and may only name themselves.
pub fn resolve_subject(claims: &Claims, requested: Option<Uuid>) -> AppResult<Uuid> {
    match (claims.is_admin(), requested) {
        (true, Some(user_id)) => Ok(user_id),
        (true, None) => Err(AppError::validation(
            "userId is required when acting as admin",
        )),
        (false, Some(user_id)) if user_id != claims.user_id() => Err(AppError::PermissionDenied(
            "Cannot act on behalf of another user".to_string(),
        )),
        (false, _) => Ok(claims.user_id()),
    }
}
