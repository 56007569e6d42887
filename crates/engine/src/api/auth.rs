//! Caller identity for HTTP routes.
//!
//! An upstream auth layer inserts an [`AuthenticatedUser`] extension. Without one,
//! the trusted gateway headers `X-User-Id` (UUID) and `X-User-Role` are read.
//!
//! ```rust,ignore
//! async fn handler(Auth(user): Auth) -> impl IntoResponse {
//!     format!("User ID: {}", user.user_id)
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use npcforge_domain::{UserId, UserRole};

use super::http::ApiError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Extractor for the authenticated caller. Rejects with 401.
#[derive(Debug, Clone, Copy)]
pub struct Auth(pub AuthenticatedUser);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // First try to get from extensions (if an auth layer ran)
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(Auth(*user));
        }

        let user_id = header(parts, USER_ID_HEADER)
            .and_then(|raw| raw.trim().parse::<UserId>().ok())
            .ok_or(ApiError::Unauthorized)?;

        let role = match header(parts, USER_ROLE_HEADER) {
            Some(raw) => raw.parse::<UserRole>().map_err(|_| ApiError::Unauthorized)?,
            None => UserRole::User,
        };

        Ok(Auth(AuthenticatedUser { user_id, role }))
    }
}
