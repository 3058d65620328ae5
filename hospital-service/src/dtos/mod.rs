pub mod auth;
pub mod hospital;
pub mod patient;
pub mod record;
pub mod staff;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
