use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hms_core::error::AppError;
use serde_json::json;

use crate::dtos::record::{CreateRecordRequest, RecordSearchQuery};
use crate::services::{CreateRecord, TenantContext};
use crate::utils::ValidatedJson;
use crate::AppState;

pub async fn create_record(
    State(state): State<AppState>,
    ctx: TenantContext,
    ValidatedJson(req): ValidatedJson<CreateRecordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.records.record(
        &ctx,
        CreateRecord {
            patient_name: req.patient_name,
            pan_number: req.pan_number,
            aadhaar_number: req.aadhaar_number,
            record_type: req.record_type,
            record_date: req.record_date,
            diagnosis: req.diagnosis,
            treatment: req.treatment,
            doctor_name: req.doctor_name,
            department: req.department,
            notes: req.notes,
            is_shared: req.is_shared,
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "record": record }
        })),
    ))
}

/// Cross-hospital search by national identifier. Authenticated but
/// deliberately not tenant-scoped.
pub async fn search_records(
    State(state): State<AppState>,
    Query(query): Query<RecordSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let records = state
        .records
        .lookup(query.pan_number.as_deref(), query.aadhaar_number.as_deref())?;

    Ok(Json(json!({
        "status": "success",
        "results": records.len(),
        "data": { "records": records }
    })))
}
