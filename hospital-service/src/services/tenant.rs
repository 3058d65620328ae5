//! Tenant resolution.
//!
//! [`TenantContext`] is the proof of tenant membership that every scoped
//! store read requires. Its fields are private and only the resolver can
//! build one, so a handler cannot conjure a context for a hospital the
//! caller does not belong to.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Hospital, StaffRole};
use crate::services::store::MembershipStore;
use crate::services::ServiceError;

#[derive(Debug, Clone)]
pub struct TenantContext {
    hospital_id: Uuid,
    role: StaffRole,
    staff_email: String,
}

impl TenantContext {
    pub fn hospital_id(&self) -> Uuid {
        self.hospital_id
    }

    pub fn role(&self) -> StaffRole {
        self.role
    }

    pub fn staff_email(&self) -> &str {
        &self.staff_email
    }
}

pub struct TenantResolver {
    membership: Arc<MembershipStore>,
}

impl TenantResolver {
    pub fn new(membership: Arc<MembershipStore>) -> Self {
        Self { membership }
    }

    /// Resolve an authenticated staff email to its hospital context.
    /// Missing roster entry or dangling hospital both fail closed.
    pub fn resolve(&self, email: &str) -> Result<TenantContext, ServiceError> {
        let member = self
            .membership
            .find_staff_by_email(email)
            .ok_or(ServiceError::NoMembership)?;

        if self.membership.find_hospital(member.hospital_id).is_none() {
            return Err(ServiceError::NoMembership);
        }

        Ok(TenantContext {
            hospital_id: member.hospital_id,
            role: member.role,
            staff_email: member.email,
        })
    }

    pub fn hospital_of(&self, ctx: &TenantContext) -> Option<Hospital> {
        self.membership.find_hospital(ctx.hospital_id())
    }
}
