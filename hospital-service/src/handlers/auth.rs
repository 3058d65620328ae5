use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hms_core::error::AppError;
use serde_json::json;

use crate::dtos::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
use crate::middleware::CurrentUser;
use crate::services::{RegisterStaff, TenantContext};
use crate::utils::{Password, ValidatedJson};
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (member, token) = state
        .auth
        .register(RegisterStaff {
            hospital_id: req.hospital_id,
            email: req.email,
            password: Password::new(req.password),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "token": token,
            "data": { "user": member }
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .auth
        .login(&req.email, &Password::new(req.password))
        .await?;

    Ok(Json(json!({
        "status": "success",
        "token": outcome.token,
        "forcePasswordChange": outcome.force_password_change,
        "data": {
            "user": outcome.staff,
            "hospital": outcome.hospital,
        }
    })))
}

pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let (staff, hospital, force_password_change) = state.auth.profile(&user.email)?;

    Ok(Json(json!({
        "status": "success",
        "forcePasswordChange": force_password_change,
        "data": {
            "user": staff,
            "hospital": hospital,
        }
    })))
}

pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = state
        .auth
        .change_password(
            &user.email,
            &Password::new(req.current_password),
            &Password::new(req.new_password),
        )
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Password changed successfully",
        "token": token,
    })))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.forgot_password(&req.email).await?;

    // Identical response whether or not the email is registered.
    Ok(Json(json!({
        "status": "success",
        "message": "If that email is registered, a reset link has been sent",
    })))
}

pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (_, token) = state
        .auth
        .reset_password(&req.token, &Password::new(req.password))
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Password reset successfully",
        "token": token,
    })))
}

pub async fn force_password_change(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.force_password_change(&ctx, &email)?;

    Ok(Json(json!({
        "status": "success",
        "message": "User will be required to change password at next access",
    })))
}
