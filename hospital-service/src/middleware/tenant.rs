//! Tenant-context middleware. Runs after authentication; resolves the
//! caller's hospital membership and makes the [`TenantContext`] available
//! to handlers via extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use hms_core::error::AppError;

use crate::middleware::auth::CurrentUser;
use crate::services::TenantContext;
use crate::AppState;

pub async fn tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Tenant middleware ran without authentication"
            ))
        })?;

    let ctx = state.resolver.resolve(&user.0.email)?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "TenantContext extractor used outside tenant middleware"
                ))
            })
    }
}
