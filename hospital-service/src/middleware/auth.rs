//! Bearer-token authentication middleware.
//!
//! Validates the token, loads the identity, and applies the forced-change
//! gate: a flagged identity may only reach the change-password and profile
//! endpoints until the password is rotated.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use hms_core::error::AppError;

use crate::services::{AuthenticatedStaff, ServiceError};
use crate::AppState;

/// Routes a flagged identity may still use to rotate its password.
const FORCED_CHANGE_EXEMPT: [&str; 2] = ["/api/auth/change-password", "/api/auth/me"];

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedStaff);

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::AuthError(anyhow::anyhow!("You are not logged in. Please log in to get access."))
        })?;

    let user = state.auth.authenticate(token)?;

    if user.force_password_change
        && !FORCED_CHANGE_EXEMPT.contains(&request.uri().path())
    {
        return Err(ServiceError::PasswordChangeRequired.into());
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "CurrentUser extractor used outside auth middleware"
                ))
            })
    }
}
