//! Hospital onboarding and roster management: the tenant, its admin
//! membership and credential, and the admin-driven staff provisioning
//! that every later registration builds on.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Hospital, HospitalStatus, StaffMember, StaffRole};
use crate::services::credentials::CredentialService;
use crate::services::policy::PasswordPolicy;
use crate::services::store::{generate_tenant_code, now, MembershipStore};
use crate::services::tenant::TenantContext;
use crate::services::ServiceError;
use crate::utils::Password;

pub struct RegisterHospital {
    pub name: String,
    pub license_number: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub contact_email: String,
    pub admin_email: String,
    pub admin_first_name: String,
    pub admin_last_name: String,
    pub admin_password: Password,
}

pub struct CreateStaff {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: StaffRole,
    pub phone: Option<String>,
    pub department: Option<String>,
    /// When set, an invite credential is created with the forced-change
    /// flag so the first login demands a rotation. Without it the staff
    /// member picks their own password when completing registration.
    pub temporary_password: Option<Password>,
}

pub struct HospitalService {
    membership: Arc<MembershipStore>,
    credentials: Arc<CredentialService>,
}

impl HospitalService {
    pub fn new(membership: Arc<MembershipStore>, credentials: Arc<CredentialService>) -> Self {
        Self {
            membership,
            credentials,
        }
    }

    /// Create the hospital, its admin membership and the admin credential.
    /// The password is policy-checked before anything is written so a weak
    /// one leaves no partial tenant behind. An admin email already bound
    /// to an identity or roster is rejected outright; an existing
    /// membership can never be re-pointed at a new hospital.
    pub async fn register(
        &self,
        req: RegisterHospital,
    ) -> Result<(Hospital, StaffMember), ServiceError> {
        PasswordPolicy::check(req.admin_password.as_str())?;

        let admin_email = req.admin_email.to_lowercase();
        if self.membership.find_staff_by_email(&admin_email).is_some()
            || self.credentials.exists(&admin_email)
        {
            return Err(ServiceError::AlreadyExists);
        }

        let hospital = Hospital {
            id: Uuid::new_v4(),
            name: req.name,
            license_number: req.license_number,
            tenant_code: generate_tenant_code(),
            address: req.address,
            city: req.city,
            state: req.state,
            phone: req.phone,
            contact_email: req.contact_email,
            admin_email: admin_email.clone(),
            status: HospitalStatus::Active,
            created_at: now(),
        };
        self.membership.insert_hospital(hospital.clone())?;

        self.credentials
            .create(&admin_email, &req.admin_password, false)
            .await?;

        let admin = StaffMember::new(
            hospital.id,
            &admin_email,
            req.admin_first_name,
            req.admin_last_name,
            StaffRole::HospitalAdmin,
        );
        self.membership.insert_staff(admin.clone())?;

        tracing::info!(
            hospital_id = %hospital.id,
            tenant_code = %hospital.tenant_code,
            "Hospital registered"
        );
        Ok((hospital, admin))
    }

    /// Admin-only: provision a membership in the caller's hospital. This
    /// is the only way a roster row comes into existence after onboarding;
    /// registration merely completes it with a credential.
    pub async fn add_staff(
        &self,
        actor: &TenantContext,
        req: CreateStaff,
    ) -> Result<StaffMember, ServiceError> {
        if actor.role() != StaffRole::HospitalAdmin {
            return Err(ServiceError::Forbidden(
                "Only hospital administrators can add staff".to_string(),
            ));
        }

        let email = req.email.to_lowercase();
        if self.membership.find_staff_by_email(&email).is_some()
            || self.credentials.exists(&email)
        {
            return Err(ServiceError::AlreadyExists);
        }

        if let Some(temporary) = &req.temporary_password {
            self.credentials.create(&email, temporary, true).await?;
        }

        let mut member = StaffMember::new(
            actor.hospital_id(),
            &email,
            req.first_name,
            req.last_name,
            req.role,
        );
        member.phone = req.phone;
        member.department = req.department;
        self.membership.insert_staff(member.clone())?;

        tracing::info!(
            user = %member.email,
            hospital_id = %member.hospital_id,
            requested_by = %actor.staff_email(),
            "Staff member provisioned"
        );
        Ok(member)
    }
}
