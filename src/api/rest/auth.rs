use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// Caller role taken from the `x-role` header. Only coordinators and admins
/// may request suggestions or touch assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Coordinator,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Role
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get("x-role").and_then(|v| v.to_str().ok()) {
            Some("admin") => Ok(Role::Admin),
            Some("coordinator") => Ok(Role::Coordinator),
            Some(other) => Err(AppError::Unauthorized(format!(
                "role {other} may not manage staffing"
            ))),
            None => Err(AppError::Unauthorized("missing x-role header".to_string())),
        }
    }
}
