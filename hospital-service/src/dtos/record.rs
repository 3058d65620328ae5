use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::RecordType;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    #[validate(length(min = 1, message = "Patient name is required"))]
    pub patient_name: String,
    pub pan_number: Option<String>,
    pub aadhaar_number: Option<String>,
    pub record_type: RecordType,
    pub record_date: Option<DateTime<Utc>>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub doctor_name: Option<String>,
    pub department: Option<String>,
    pub notes: Option<String>,
    pub is_shared: Option<bool>,
}

/// Query string for the national record search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSearchQuery {
    pub pan_number: Option<String>,
    pub aadhaar_number: Option<String>,
}
