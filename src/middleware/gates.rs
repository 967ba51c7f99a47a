use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

// Composable authorization checks. Each takes the request's resolved
// identity (possibly absent) and either proceeds or rejects with a named
// kind. Gates are evaluated before any repository logic runs; the first
// rejection wins.

pub fn require_logged_in(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    user.ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

pub fn require_admin(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    let user = require_logged_in(user)?;
    if !user.is_admin {
        return Err(ApiError::forbidden("Administrator privileges required"));
    }
    Ok(user)
}

/// Proceed if the identity is an administrator or addresses its own resource.
pub fn require_self_or_admin<'a>(
    user: Option<&'a AuthUser>,
    target_username: &str,
) -> Result<&'a AuthUser, ApiError> {
    let user = require_logged_in(user)?;
    if user.is_admin || user.username == target_username {
        Ok(user)
    } else {
        Err(ApiError::forbidden("Insufficient privileges for this resource"))
    }
}
