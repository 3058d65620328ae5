use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use hms_core::error::AppError;
use serde_json::json;

use crate::dtos::staff::CreateStaffRequest;
use crate::services::{CreateStaff, TenantContext};
use crate::utils::{Password, ValidatedJson};
use crate::AppState;

pub async fn create_staff(
    State(state): State<AppState>,
    ctx: TenantContext,
    ValidatedJson(req): ValidatedJson<CreateStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .hospitals
        .add_staff(
            &ctx,
            CreateStaff {
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
                role: req.role,
                phone: req.phone,
                department: req.department,
                temporary_password: req.temporary_password.map(Password::new),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "user": member }
        })),
    ))
}
