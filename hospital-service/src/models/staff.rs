//! Staff membership - the binding of one identity to one hospital and role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    HospitalAdmin,
    Doctor,
    Nurse,
    Pharmacist,
    Receptionist,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::HospitalAdmin => "HOSPITAL_ADMIN",
            StaffRole::Doctor => "DOCTOR",
            StaffRole::Nurse => "NURSE",
            StaffRole::Pharmacist => "PHARMACIST",
            StaffRole::Receptionist => "RECEPTIONIST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffStatus {
    Active,
    Inactive,
    Locked,
}

/// Membership row. An identity holds at most one active membership; the
/// tenant resolver treats the binding as 1:1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: Uuid,
    pub hospital_id: Uuid,
    /// Lowercase email linking to the credential record.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub role: StaffRole,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
}

impl StaffMember {
    pub fn new(
        hospital_id: Uuid,
        email: &str,
        first_name: String,
        last_name: String,
        role: StaffRole,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            hospital_id,
            email: email.to_lowercase(),
            first_name,
            last_name,
            phone: None,
            department: None,
            role,
            status: StaffStatus::Active,
            created_at: Utc::now(),
        }
    }
}
