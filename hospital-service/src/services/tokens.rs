//! Session token issuance and validation (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Staff email, lowercase.
    pub sub: String,
    /// Issued-at, seconds since epoch. Compared against the identity's
    /// password-change timestamp on every authenticated request.
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl SessionTokenService {
    pub fn new(secret: &str, lifetime_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::days(lifetime_days),
        }
    }

    pub fn issue(&self, email: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: email.to_lowercase(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Decode and verify signature and expiry. Staleness against password
    /// changes is the caller's job since it needs the identity.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::TokenMalformed,
            })
    }
}
