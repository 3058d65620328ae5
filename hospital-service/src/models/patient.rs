//! Patient profile, scoped to its owning hospital.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub hospital_id: Uuid,
    /// Per-hospital sequential code, e.g. `P-00001`.
    pub patient_code: String,
    /// National-identity keys used by cross-hospital record lookup.
    /// PAN is stored uppercased.
    pub pan_number: Option<String>,
    pub aadhaar_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub admission_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
