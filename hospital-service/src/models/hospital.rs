//! Hospital - the tenant unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HospitalStatus {
    Pending,
    Active,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    /// Unique across all tenants; registration rejects duplicates.
    pub license_number: String,
    /// Human-facing tenant code, e.g. `HOSP-4F8A21C09`.
    pub tenant_code: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub contact_email: String,
    pub admin_email: String,
    pub status: HospitalStatus,
    pub created_at: DateTime<Utc>,
}
