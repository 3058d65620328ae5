//! National medical record index.
//!
//! The one and only cross-tenant read path in the service. Records enter
//! through [`NationalRecordIndex::append`] with their owning hospital
//! stamped; reads are either tenant-scoped ([`NationalRecordIndex::list_for`])
//! or national-identifier lookups that see shared records from every
//! hospital ([`NationalRecordIndex::lookup_shared`]).

use dashmap::DashMap;
use uuid::Uuid;

use crate::models::MedicalRecord;
use crate::services::tenant::TenantContext;

/// Hard cap on lookup result size.
pub const LOOKUP_LIMIT: usize = 100;

#[derive(Default)]
pub struct NationalRecordIndex {
    records: DashMap<Uuid, MedicalRecord>,
}

impl NationalRecordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: MedicalRecord) {
        self.records.insert(record.id, record);
    }

    pub fn get(&self, record_id: Uuid) -> Option<MedicalRecord> {
        self.records.get(&record_id).map(|entry| entry.clone())
    }

    /// Records created by the caller's hospital, newest first.
    pub fn list_for(&self, ctx: &TenantContext) -> Vec<MedicalRecord> {
        let mut records: Vec<MedicalRecord> = self
            .records
            .iter()
            .filter(|entry| entry.value().hospital_id == ctx.hospital_id())
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Shared records matching the given national identifiers, across all
    /// hospitals, newest record date first, capped at [`LOOKUP_LIMIT`].
    /// When both identifiers are supplied a record must match both.
    /// Unshared records never leave their hospital through this path.
    pub fn lookup_shared(&self, pan: Option<&str>, aadhaar: Option<&str>) -> Vec<MedicalRecord> {
        let mut matches: Vec<MedicalRecord> = self
            .records
            .iter()
            .filter(|entry| {
                let record = entry.value();
                if !record.is_shared {
                    return false;
                }
                let pan_match = match pan {
                    Some(p) => record.patient_pan.as_deref() == Some(p),
                    None => true,
                };
                let aadhaar_match = match aadhaar {
                    Some(a) => record.patient_aadhaar.as_deref() == Some(a),
                    None => true,
                };
                pan_match && aadhaar_match
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by(|a, b| b.record_date.cmp(&a.record_date));
        matches.truncate(LOOKUP_LIMIT);
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordOrigin, RecordType};
    use chrono::{Duration, Utc};

    fn record(hospital: Uuid, pan: Option<&str>, shared: bool, age_days: i64) -> MedicalRecord {
        MedicalRecord {
            id: Uuid::new_v4(),
            patient_pan: pan.map(str::to_string),
            patient_aadhaar: None,
            patient_name: "Asha Rao".to_string(),
            hospital_id: hospital,
            hospital_name: "General".to_string(),
            record_type: RecordType::Diagnosis,
            origin: RecordOrigin::Clinical,
            record_date: Utc::now() - Duration::days(age_days),
            diagnosis: Some("Observation".to_string()),
            treatment: None,
            doctor_name: None,
            department: None,
            notes: None,
            is_shared: shared,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn lookup_spans_hospitals_and_sorts_newest_first() {
        let index = NationalRecordIndex::new();
        let older = record(Uuid::new_v4(), Some("ABCDE1234F"), true, 10);
        let newer = record(Uuid::new_v4(), Some("ABCDE1234F"), true, 1);
        let (older_id, newer_id) = (older.id, newer.id);
        index.append(older);
        index.append(newer);

        let found = index.lookup_shared(Some("ABCDE1234F"), None);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, newer_id);
        assert_eq!(found[1].id, older_id);
    }

    #[test]
    fn unshared_records_are_invisible() {
        let index = NationalRecordIndex::new();
        index.append(record(Uuid::new_v4(), Some("ABCDE1234F"), false, 1));
        assert!(index.lookup_shared(Some("ABCDE1234F"), None).is_empty());
    }

    #[test]
    fn both_identifiers_must_match_when_given() {
        let index = NationalRecordIndex::new();
        let mut rec = record(Uuid::new_v4(), Some("ABCDE1234F"), true, 1);
        rec.patient_aadhaar = Some("123456789012".to_string());
        index.append(rec);

        assert_eq!(
            index
                .lookup_shared(Some("ABCDE1234F"), Some("123456789012"))
                .len(),
            1
        );
        assert!(index
            .lookup_shared(Some("ABCDE1234F"), Some("000000000000"))
            .is_empty());
    }
}
