use hms_core::error::AppError;
use thiserror::Error;

use crate::services::policy::PolicyRule;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Password does not meet policy: {}", format_rules(.0))]
    WeakPassword(Vec<PolicyRule>),

    #[error("New password cannot be same as a recently used password")]
    PasswordReused,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    AlreadyExists,

    #[error("No hospital association found for this user")]
    NoMembership,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenMalformed,

    #[error("Password was recently changed. Please login again.")]
    StalePasswordChange,

    #[error("Password change required")]
    PasswordChangeRequired,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Email could not be sent. Please try again later.")]
    EmailDelivery(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn format_rules(rules: &[PolicyRule]) -> String {
    rules
        .iter()
        .map(|r| r.description())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::WeakPassword(_)
            | ServiceError::PasswordReused
            | ServiceError::InvalidResetToken => AppError::BadRequest(anyhow::anyhow!("{}", err)),
            ServiceError::InvalidQuery(_) => AppError::BadRequest(anyhow::anyhow!("{}", err)),
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::TokenExpired
            | ServiceError::TokenMalformed
            | ServiceError::StalePasswordChange => AppError::AuthError(anyhow::anyhow!("{}", err)),
            ServiceError::AlreadyExists => AppError::Conflict(anyhow::anyhow!("{}", err)),
            ServiceError::NoMembership
            | ServiceError::PasswordChangeRequired => {
                AppError::Forbidden(anyhow::anyhow!("{}", err))
            }
            ServiceError::Forbidden(msg) => AppError::Forbidden(anyhow::anyhow!(msg)),
            ServiceError::NotFound(_) => AppError::NotFound(anyhow::anyhow!("{}", err)),
            ServiceError::EmailDelivery(detail) => {
                tracing::error!(error = %detail, "Notification sink failure");
                AppError::ServiceUnavailable(
                    "Email could not be sent. Please try again later.".to_string(),
                )
            }
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
