//! In-memory stores backing the service.
//!
//! Every store keys on a single identifier and relies on DashMap shard
//! locks for atomicity: mutations run as closures under the entry lock and
//! never hold a lock across an await point.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{Hospital, Identity, Patient, StaffMember};
use crate::services::tenant::TenantContext;
use crate::services::ServiceError;

/// Staff credentials keyed by lowercase email.
#[derive(Default)]
pub struct CredentialStore {
    identities: DashMap<String, Identity>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.identities.contains_key(&email.to_lowercase())
    }

    /// Insert a brand-new identity. Fails if the email is already taken;
    /// the entry API makes the check-and-insert atomic.
    pub fn insert(&self, identity: Identity) -> Result<(), ServiceError> {
        match self.identities.entry(identity.email.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(ServiceError::AlreadyExists),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(identity);
                Ok(())
            }
        }
    }

    /// Read-only snapshot of an identity.
    pub fn find(&self, email: &str) -> Option<Identity> {
        self.identities
            .get(&email.to_lowercase())
            .map(|entry| entry.clone())
    }

    /// Snapshot of the first identity matching `pred`. Callers that go on
    /// to mutate must re-validate under the entry lock; the snapshot can
    /// go stale the moment this returns.
    pub fn find_where(&self, pred: impl Fn(&Identity) -> bool) -> Option<Identity> {
        self.identities
            .iter()
            .find(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
    }

    /// Run a mutation against one identity under its entry lock. All
    /// read-check-write sequences (reuse checks, reset consumption, flag
    /// flips) go through here so concurrent callers serialize per identity.
    pub fn mutate<T>(
        &self,
        email: &str,
        f: impl FnOnce(&mut Identity) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut entry = self
            .identities
            .get_mut(&email.to_lowercase())
            .ok_or(ServiceError::NotFound("User"))?;
        f(entry.value_mut())
    }

    /// Locate the identity matching `pred`, then apply `f` under the entry
    /// lock. The predicate is re-checked under the lock so two callers
    /// racing on the same match cannot both win.
    pub fn consume_where<T>(
        &self,
        pred: impl Fn(&Identity) -> bool,
        f: impl FnOnce(&mut Identity) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let key = self
            .identities
            .iter()
            .find(|entry| pred(entry.value()))
            .map(|entry| entry.key().clone())
            .ok_or(ServiceError::InvalidResetToken)?;

        let mut entry = self
            .identities
            .get_mut(&key)
            .ok_or(ServiceError::InvalidResetToken)?;
        if !pred(entry.value()) {
            return Err(ServiceError::InvalidResetToken);
        }
        f(entry.value_mut())
    }
}

/// Hospitals and their staff rosters.
#[derive(Default)]
pub struct MembershipStore {
    hospitals: DashMap<Uuid, Hospital>,
    staff: DashMap<String, StaffMember>,
}

impl MembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hospital, enforcing license-number uniqueness.
    pub fn insert_hospital(&self, hospital: Hospital) -> Result<(), ServiceError> {
        let duplicate = self
            .hospitals
            .iter()
            .any(|entry| entry.value().license_number == hospital.license_number);
        if duplicate {
            return Err(ServiceError::AlreadyExists);
        }
        self.hospitals.insert(hospital.id, hospital);
        Ok(())
    }

    pub fn find_hospital(&self, hospital_id: Uuid) -> Option<Hospital> {
        self.hospitals.get(&hospital_id).map(|entry| entry.clone())
    }

    /// Insert a membership row. An email already on any roster is
    /// rejected: the first binding stays authoritative and cannot be
    /// re-pointed at another hospital.
    pub fn insert_staff(&self, member: StaffMember) -> Result<(), ServiceError> {
        match self.staff.entry(member.email.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(ServiceError::AlreadyExists),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(member);
                Ok(())
            }
        }
    }

    /// Resolve a staff member by email. One hospital per staff member.
    pub fn find_staff_by_email(&self, email: &str) -> Option<StaffMember> {
        self.staff
            .get(&email.to_lowercase())
            .map(|entry| entry.clone())
    }

    /// Whether `email` belongs to the roster of `hospital_id`.
    pub fn staff_in_hospital(&self, email: &str, hospital_id: Uuid) -> bool {
        self.find_staff_by_email(email)
            .map(|member| member.hospital_id == hospital_id)
            .unwrap_or(false)
    }
}

/// Tenant-scoped patient registry. Every public read takes a
/// [`TenantContext`] and filters by its hospital; the single unscoped
/// lookup is crate-private and reserved for the cross-hospital record
/// linker's bridge path.
#[derive(Default)]
pub struct PatientStore {
    patients: DashMap<Uuid, Patient>,
    code_counters: DashMap<Uuid, u64>,
}

impl PatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, patient: Patient) {
        self.patients.insert(patient.id, patient);
    }

    /// Next sequential patient code for a hospital, `P-00001` style. The
    /// per-hospital counter increments under its entry lock, so concurrent
    /// registrations never mint the same code.
    pub fn next_patient_code(&self, hospital_id: Uuid) -> String {
        let mut counter = self.code_counters.entry(hospital_id).or_insert(0);
        *counter += 1;
        format!("P-{:05}", *counter)
    }

    /// All patients of the caller's hospital, newest registration first.
    pub fn list_for(&self, ctx: &TenantContext) -> Vec<Patient> {
        let mut patients: Vec<Patient> = self
            .patients
            .iter()
            .filter(|entry| entry.value().hospital_id == ctx.hospital_id())
            .map(|entry| entry.value().clone())
            .collect();
        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        patients
    }

    /// A patient by id, only if it belongs to the caller's hospital. A
    /// foreign id is indistinguishable from a missing one.
    pub fn find(&self, ctx: &TenantContext, patient_id: Uuid) -> Option<Patient> {
        self.patients
            .get(&patient_id)
            .filter(|entry| entry.value().hospital_id == ctx.hospital_id())
            .map(|entry| entry.clone())
    }

    /// Unscoped national-id lookup for the record linker's profile-import
    /// bridge. Not reachable from any handler.
    pub(crate) fn find_by_national_id_unscoped(
        &self,
        pan: Option<&str>,
        aadhaar: Option<&str>,
    ) -> Option<Patient> {
        self.patients
            .iter()
            .filter(|entry| {
                let patient = entry.value();
                let pan_match = match pan {
                    Some(p) => patient.pan_number.as_deref() == Some(p),
                    None => true,
                };
                let aadhaar_match = match aadhaar {
                    Some(a) => patient.aadhaar_number.as_deref() == Some(a),
                    None => true,
                };
                pan_match && aadhaar_match
            })
            .max_by_key(|entry| entry.value().created_at)
            .map(|entry| entry.value().clone())
    }
}

/// Helper used by hospital registration.
pub fn generate_tenant_code() -> String {
    use rand::Rng;
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("HOSP-{}", suffix)
}

/// Current timestamp helper so time handling stays in one place.
pub fn now() -> chrono::DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hospital, HospitalStatus, Identity};

    #[test]
    fn duplicate_email_rejected() {
        let store = CredentialStore::new();
        store
            .insert(Identity::new("a@b.com", "$argon2id$stub".to_string()))
            .unwrap();
        let err = store
            .insert(Identity::new("A@B.com", "$argon2id$stub".to_string()))
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists));
    }

    #[test]
    fn mutate_on_missing_identity_is_not_found() {
        let store = CredentialStore::new();
        let err = store.mutate("ghost@b.com", |_| Ok(())).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("User")));
    }

    #[test]
    fn license_number_must_be_unique() {
        let store = MembershipStore::new();
        let mk = || Hospital {
            id: Uuid::new_v4(),
            name: "General".to_string(),
            license_number: "LIC-1".to_string(),
            tenant_code: generate_tenant_code(),
            address: None,
            city: None,
            state: None,
            phone: None,
            contact_email: "c@h.com".to_string(),
            admin_email: "admin@h.com".to_string(),
            status: HospitalStatus::Active,
            created_at: now(),
        };
        store.insert_hospital(mk()).unwrap();
        let err = store.insert_hospital(mk()).unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists));
    }

    #[test]
    fn staff_email_cannot_be_rebound() {
        use crate::models::{StaffMember, StaffRole};

        let store = MembershipStore::new();
        let home = Uuid::new_v4();
        store
            .insert_staff(StaffMember::new(
                home,
                "doc@h.com",
                "Asha".to_string(),
                "Rao".to_string(),
                StaffRole::Doctor,
            ))
            .unwrap();

        let err = store
            .insert_staff(StaffMember::new(
                Uuid::new_v4(),
                "doc@h.com",
                "Evil".to_string(),
                "Twin".to_string(),
                StaffRole::HospitalAdmin,
            ))
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists));

        let member = store.find_staff_by_email("doc@h.com").unwrap();
        assert_eq!(member.hospital_id, home);
        assert_eq!(member.role, StaffRole::Doctor);
    }

    #[test]
    fn patient_codes_are_sequential_per_hospital() {
        let store = PatientStore::new();
        let hospital = Uuid::new_v4();
        assert_eq!(store.next_patient_code(hospital), "P-00001");
        assert_eq!(store.next_patient_code(hospital), "P-00002");
        assert_eq!(store.next_patient_code(Uuid::new_v4()), "P-00001");
    }

    #[test]
    fn concurrent_patient_codes_never_collide() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let store = Arc::new(PatientStore::new());
        let hospital = Uuid::new_v4();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.next_patient_code(hospital))
            })
            .collect();

        let codes: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn tenant_code_shape() {
        let code = generate_tenant_code();
        assert!(code.starts_with("HOSP-"));
        assert_eq!(code.len(), 14);
    }
}
