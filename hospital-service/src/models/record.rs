//! Shareable medical record, keyed by national identity (PAN/Aadhaar)
//! rather than any hospital-local id. Records are append-only: nothing in
//! this service mutates a record after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    Diagnosis,
    Prescription,
    LabReport,
    Admission,
    Discharge,
    Surgery,
    Allergy,
    Vaccination,
}

/// Provenance marker distinguishing physician-authored entries from
/// summaries synthesized out of a patient profile during cross-hospital
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordOrigin {
    Clinical,
    ProfileImport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_pan: Option<String>,
    pub patient_aadhaar: Option<String>,
    pub patient_name: String,
    /// Hospital of origin; informational only, never used for scoping.
    pub hospital_id: Uuid,
    pub hospital_name: String,
    pub record_type: RecordType,
    pub origin: RecordOrigin,
    pub record_date: DateTime<Utc>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub doctor_name: Option<String>,
    pub department: Option<String>,
    pub notes: Option<String>,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
}
