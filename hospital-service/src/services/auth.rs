//! Authentication flows: registration, login, session validation, password
//! change/reset and the admin-driven forced change.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Hospital, StaffMember, StaffRole};
use crate::services::credentials::CredentialService;
use crate::services::email::EmailProvider;
use crate::services::store::MembershipStore;
use crate::services::tenant::TenantContext;
use crate::services::tokens::SessionTokenService;
use crate::services::ServiceError;
use crate::utils::Password;

/// Everything the login endpoint returns to the client.
pub struct LoginOutcome {
    pub token: String,
    pub staff: StaffMember,
    pub hospital: Hospital,
    pub force_password_change: bool,
}

/// Result of validating a bearer token against the credential store.
#[derive(Debug, Clone)]
pub struct AuthenticatedStaff {
    pub email: String,
    pub force_password_change: bool,
}

pub struct RegisterStaff {
    pub hospital_id: Uuid,
    pub email: String,
    pub password: Password,
}

pub struct AuthService {
    credentials: Arc<CredentialService>,
    tokens: Arc<SessionTokenService>,
    membership: Arc<MembershipStore>,
    email: Arc<dyn EmailProvider>,
    frontend_url: String,
}

impl AuthService {
    pub fn new(
        credentials: Arc<CredentialService>,
        tokens: Arc<SessionTokenService>,
        membership: Arc<MembershipStore>,
        email: Arc<dyn EmailProvider>,
        frontend_url: String,
    ) -> Self {
        Self {
            credentials,
            tokens,
            membership,
            email,
            frontend_url,
        }
    }

    /// Complete registration for a pre-provisioned membership and sign the
    /// staff member straight in. The roster row is the invitation: an
    /// email with no row, or one bound to a different hospital, is
    /// rejected rather than defaulted, so registration can never mint a
    /// membership or a role of the caller's choosing.
    pub async fn register(&self, req: RegisterStaff) -> Result<(StaffMember, String), ServiceError> {
        let member = self
            .membership
            .find_staff_by_email(&req.email)
            .ok_or(ServiceError::NoMembership)?;
        if member.hospital_id != req.hospital_id {
            return Err(ServiceError::NoMembership);
        }

        self.credentials
            .create(&member.email, &req.password, false)
            .await?;

        tracing::info!(user = %member.email, hospital_id = %member.hospital_id, "Staff registration completed");
        let token = self.tokens.issue(&member.email)?;
        Ok((member, token))
    }

    /// Verify credentials and issue a session token. Unknown email, wrong
    /// password and missing membership all surface as the same 401.
    pub async fn login(
        &self,
        email: &str,
        password: &Password,
    ) -> Result<LoginOutcome, ServiceError> {
        let identity = self.credentials.verify(email, password).await?;

        let staff = self
            .membership
            .find_staff_by_email(&identity.email)
            .ok_or(ServiceError::NoMembership)?;
        let hospital = self
            .membership
            .find_hospital(staff.hospital_id)
            .ok_or(ServiceError::NoMembership)?;

        let token = self.tokens.issue(&identity.email)?;
        tracing::info!(user = %identity.email, hospital_id = %hospital.id, "Login succeeded");

        Ok(LoginOutcome {
            token,
            staff,
            hospital,
            force_password_change: identity.force_password_change,
        })
    }

    /// Validate a bearer token: signature, expiry, the identity still
    /// existing, and the token predating no password change.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedStaff, ServiceError> {
        let claims = self.tokens.validate(token)?;

        let identity = self
            .credentials
            .find(&claims.sub)
            .ok_or(ServiceError::InvalidCredentials)?;

        if identity.changed_password_after(claims.iat) {
            return Err(ServiceError::StalePasswordChange);
        }

        Ok(AuthenticatedStaff {
            email: identity.email,
            force_password_change: identity.force_password_change,
        })
    }

    /// Profile lookup for the `me` endpoint. Reachable by flagged
    /// identities, so the forced-change state rides along.
    pub fn profile(
        &self,
        email: &str,
    ) -> Result<(StaffMember, Hospital, bool), ServiceError> {
        let identity = self
            .credentials
            .find(email)
            .ok_or(ServiceError::InvalidCredentials)?;
        let staff = self
            .membership
            .find_staff_by_email(email)
            .ok_or(ServiceError::NoMembership)?;
        let hospital = self
            .membership
            .find_hospital(staff.hospital_id)
            .ok_or(ServiceError::NoMembership)?;
        Ok((staff, hospital, identity.force_password_change))
    }

    /// Self-service password change. Returns a fresh token minted after
    /// the rotation so the caller's session survives the staleness check.
    pub async fn change_password(
        &self,
        email: &str,
        current: &Password,
        new: &Password,
    ) -> Result<String, ServiceError> {
        self.credentials.change_password(email, current, new).await?;
        tracing::info!(user = %email, "Password changed");
        self.tokens.issue(email)
    }

    /// Start the reset flow. Silent on unknown email; on delivery failure
    /// the stored token is rolled back so a later attempt starts clean.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ServiceError> {
        let Some(token) = self.credentials.issue_reset_token(email) else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        if let Err(e) = self
            .email
            .send_password_reset_email(email, &token, &self.frontend_url)
            .await
        {
            self.credentials.clear_reset_token(email);
            return Err(e);
        }

        tracing::info!(user = %email, "Password reset email sent");
        Ok(())
    }

    /// Consume a reset token and sign the user straight in.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        new: &Password,
    ) -> Result<(String, String), ServiceError> {
        let email = self.credentials.consume_reset_token(raw_token, new).await?;
        tracing::info!(user = %email, "Password reset completed");
        let session = self.tokens.issue(&email)?;
        Ok((email, session))
    }

    /// Admin-only: flag a same-hospital staff member for a forced change.
    pub fn force_password_change(
        &self,
        actor: &TenantContext,
        target_email: &str,
    ) -> Result<(), ServiceError> {
        if actor.role() != StaffRole::HospitalAdmin {
            return Err(ServiceError::Forbidden(
                "Only hospital administrators can force a password change".to_string(),
            ));
        }

        let target = self
            .membership
            .find_staff_by_email(target_email)
            .ok_or(ServiceError::NotFound("User"))?;
        if target.hospital_id != actor.hospital_id() {
            return Err(ServiceError::Forbidden(
                "Target user belongs to a different hospital".to_string(),
            ));
        }

        self.credentials.set_force_flag(&target.email, true)?;
        tracing::info!(
            user = %target.email,
            hospital_id = %actor.hospital_id(),
            requested_by = %actor.staff_email(),
            "Forced password change flagged"
        );
        Ok(())
    }
}
