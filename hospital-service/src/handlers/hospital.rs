use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use hms_core::error::AppError;
use serde_json::json;

use crate::dtos::hospital::RegisterHospitalRequest;
use crate::services::RegisterHospital;
use crate::utils::{Password, ValidatedJson};
use crate::AppState;

pub async fn register_hospital(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterHospitalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (hospital, admin) = state
        .hospitals
        .register(RegisterHospital {
            name: req.name,
            license_number: req.license_number,
            address: req.address,
            city: req.city,
            state: req.state,
            phone: req.phone,
            contact_email: req.contact_email,
            admin_email: req.admin_email,
            admin_first_name: req.admin_first_name,
            admin_last_name: req.admin_last_name,
            admin_password: Password::new(req.admin_password),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": {
                "hospital": hospital,
                "admin": admin,
            }
        })),
    ))
}
