//! Tenant-scoped patient management.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Patient;
use crate::services::store::{now, PatientStore};
use crate::services::tenant::TenantContext;
use crate::services::ServiceError;

pub struct CreatePatient {
    pub first_name: String,
    pub last_name: String,
    pub pan_number: Option<String>,
    pub aadhaar_number: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub admission_date: Option<DateTime<Utc>>,
}

pub struct PatientService {
    store: Arc<PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<PatientStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, ctx: &TenantContext) -> Vec<Patient> {
        self.store.list_for(ctx)
    }

    pub fn get(&self, ctx: &TenantContext, patient_id: Uuid) -> Result<Patient, ServiceError> {
        self.store
            .find(ctx, patient_id)
            .ok_or(ServiceError::NotFound("Patient"))
    }

    /// Register a patient in the caller's hospital. PAN is normalized to
    /// uppercase so national-id lookups match regardless of input casing.
    pub fn create(&self, ctx: &TenantContext, req: CreatePatient) -> Patient {
        let patient = Patient {
            id: Uuid::new_v4(),
            hospital_id: ctx.hospital_id(),
            patient_code: self.store.next_patient_code(ctx.hospital_id()),
            pan_number: req.pan_number.map(|p| p.trim().to_uppercase()),
            aadhaar_number: req.aadhaar_number.map(|a| a.trim().to_string()),
            first_name: req.first_name,
            last_name: req.last_name,
            gender: req.gender,
            phone: req.phone,
            department: req.department,
            medical_history: req.medical_history,
            allergies: req.allergies,
            admission_date: req.admission_date,
            created_at: now(),
        };
        self.store.insert(patient.clone());
        tracing::info!(
            hospital_id = %ctx.hospital_id(),
            patient_code = %patient.patient_code,
            "Patient registered"
        );
        patient
    }
}
