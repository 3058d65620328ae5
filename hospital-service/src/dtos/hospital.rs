use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterHospitalRequest {
    #[validate(length(min = 1, message = "Hospital name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "License number is required"))]
    pub license_number: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub contact_email: String,
    #[validate(email)]
    pub admin_email: String,
    #[validate(length(min = 1, message = "Admin first name is required"))]
    pub admin_first_name: String,
    #[validate(length(min = 1, message = "Admin last name is required"))]
    pub admin_last_name: String,
    #[validate(length(min = 1, message = "Admin password is required"))]
    pub admin_password: String,
}
