//! Cross-hospital record linking.
//!
//! The linker fronts the national index: tenant-stamped creation, the
//! national-id lookup, and the profile-import bridge that synthesizes a
//! summary record when a patient is known to some hospital but has no
//! shared records yet.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{MedicalRecord, Patient, RecordOrigin, RecordType};
use crate::services::national_index::NationalRecordIndex;
use crate::services::store::{now, MembershipStore, PatientStore};
use crate::services::tenant::TenantContext;
use crate::services::ServiceError;

pub struct CreateRecord {
    pub patient_name: String,
    pub pan_number: Option<String>,
    pub aadhaar_number: Option<String>,
    pub record_type: RecordType,
    pub record_date: Option<DateTime<Utc>>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub doctor_name: Option<String>,
    pub department: Option<String>,
    pub notes: Option<String>,
    pub is_shared: Option<bool>,
}

pub struct RecordLinker {
    index: Arc<NationalRecordIndex>,
    patients: Arc<PatientStore>,
    membership: Arc<MembershipStore>,
}

impl RecordLinker {
    pub fn new(
        index: Arc<NationalRecordIndex>,
        patients: Arc<PatientStore>,
        membership: Arc<MembershipStore>,
    ) -> Self {
        Self {
            index,
            patients,
            membership,
        }
    }

    /// Append a record stamped with the caller's hospital. Records default
    /// to shared; a record created unshared stays local forever.
    pub fn record(&self, ctx: &TenantContext, req: CreateRecord) -> MedicalRecord {
        let hospital_name = self
            .membership
            .find_hospital(ctx.hospital_id())
            .map(|h| h.name)
            .unwrap_or_default();

        let record = MedicalRecord {
            id: Uuid::new_v4(),
            patient_pan: req.pan_number.map(|p| p.trim().to_uppercase()),
            patient_aadhaar: req.aadhaar_number.map(|a| a.trim().to_string()),
            patient_name: req.patient_name,
            hospital_id: ctx.hospital_id(),
            hospital_name,
            record_type: req.record_type,
            origin: RecordOrigin::Clinical,
            record_date: req.record_date.unwrap_or_else(Utc::now),
            diagnosis: req.diagnosis,
            treatment: req.treatment,
            doctor_name: req.doctor_name,
            department: req.department,
            notes: req.notes,
            is_shared: req.is_shared.unwrap_or(true),
            created_at: now(),
        };
        self.index.append(record.clone());
        tracing::info!(
            hospital_id = %ctx.hospital_id(),
            record_type = ?record.record_type,
            shared = record.is_shared,
            "Medical record created"
        );
        record
    }

    /// National-identifier lookup across all hospitals. At least one
    /// identifier is required; PAN is matched case-insensitively by
    /// normalizing to uppercase.
    pub fn lookup(
        &self,
        pan: Option<&str>,
        aadhaar: Option<&str>,
    ) -> Result<Vec<MedicalRecord>, ServiceError> {
        let pan = pan.map(str::trim).filter(|p| !p.is_empty()).map(str::to_uppercase);
        let aadhaar = aadhaar
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        if pan.is_none() && aadhaar.is_none() {
            return Err(ServiceError::InvalidQuery(
                "Provide a PAN or Aadhaar number".to_string(),
            ));
        }

        let found = self.index.lookup_shared(pan.as_deref(), aadhaar.as_deref());
        if !found.is_empty() {
            return Ok(found);
        }

        // No shared records yet: bridge from a matching patient profile so
        // a hospital that only registered the patient still contributes a
        // summary to the national view.
        if let Some(patient) = self
            .patients
            .find_by_national_id_unscoped(pan.as_deref(), aadhaar.as_deref())
        {
            if patient.medical_history.is_some() || patient.allergies.is_some() {
                let bridged = self.bridge_from_profile(&patient);
                self.index.append(bridged.clone());
                tracing::info!(
                    hospital_id = %patient.hospital_id,
                    "Synthesized shared record from patient profile"
                );
                return Ok(vec![bridged]);
            }
        }

        Ok(Vec::new())
    }

    fn bridge_from_profile(&self, patient: &Patient) -> MedicalRecord {
        let hospital_name = self
            .membership
            .find_hospital(patient.hospital_id)
            .map(|h| h.name)
            .unwrap_or_default();

        MedicalRecord {
            id: Uuid::new_v4(),
            patient_pan: patient.pan_number.clone(),
            patient_aadhaar: patient.aadhaar_number.clone(),
            patient_name: patient.full_name(),
            hospital_id: patient.hospital_id,
            hospital_name,
            record_type: RecordType::Diagnosis,
            origin: RecordOrigin::ProfileImport,
            record_date: patient.admission_date.unwrap_or_else(Utc::now),
            diagnosis: Some(
                patient
                    .medical_history
                    .clone()
                    .unwrap_or_else(|| "Patient registered".to_string()),
            ),
            treatment: None,
            doctor_name: None,
            department: patient.department.clone(),
            notes: patient.allergies.as_ref().map(|a| format!("Allergies: {}", a)),
            is_shared: true,
            created_at: now(),
        }
    }
}
