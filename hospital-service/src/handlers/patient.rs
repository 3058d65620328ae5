use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hms_core::error::AppError;
use serde_json::json;
use uuid::Uuid;

use crate::dtos::patient::CreatePatientRequest;
use crate::services::{CreatePatient, TenantContext};
use crate::utils::ValidatedJson;
use crate::AppState;

pub async fn list_patients(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let patients = state.patients.list(&ctx);

    Ok(Json(json!({
        "status": "success",
        "results": patients.len(),
        "data": { "patients": patients }
    })))
}

pub async fn get_patient(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(patient_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let patient = state.patients.get(&ctx, patient_id)?;

    Ok(Json(json!({
        "status": "success",
        "data": { "patient": patient }
    })))
}

pub async fn create_patient(
    State(state): State<AppState>,
    ctx: TenantContext,
    ValidatedJson(req): ValidatedJson<CreatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patient = state.patients.create(
        &ctx,
        CreatePatient {
            first_name: req.first_name,
            last_name: req.last_name,
            pan_number: req.pan_number,
            aadhaar_number: req.aadhaar_number,
            gender: req.gender,
            phone: req.phone,
            department: req.department,
            medical_history: req.medical_history,
            allergies: req.allergies,
            admission_date: req.admission_date,
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "patient": patient }
        })),
    ))
}
