use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub pan_number: Option<String>,
    pub aadhaar_number: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub admission_date: Option<DateTime<Utc>>,
}
