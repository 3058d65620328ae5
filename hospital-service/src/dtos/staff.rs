use serde::Deserialize;
use validator::Validate;

use crate::models::StaffRole;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub role: StaffRole,
    pub phone: Option<String>,
    pub department: Option<String>,
    /// Optional invite credential; omitted when the staff member will set
    /// their own password at registration.
    pub temporary_password: Option<String>,
}
