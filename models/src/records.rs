// models/src/records.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A historical consultation entry. Append-only from this system's
/// perspective; no update or delete operation is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: DateTime<Utc>,
    pub doctor: String,
    pub diagnosis: String,
    pub meds: Vec<String>,
    pub notes: String,
    pub record_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedicalRecord {
    pub patient_id: String,
    pub patient_name: String,
    pub date: DateTime<Utc>,
    pub doctor: String,
    pub diagnosis: String,
    pub meds: Vec<String>,
    pub notes: String,
    pub record_type: String,
}

impl NewMedicalRecord {
    pub fn into_record(self, id: String) -> MedicalRecord {
        MedicalRecord {
            id,
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            date: self.date,
            doctor: self.doctor,
            diagnosis: self.diagnosis,
            meds: self.meds,
            notes: self.notes,
            record_type: self.record_type,
        }
    }
}

/// One row of the derived patient registry view. Recomputed on read from the
/// record history, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub patient_id: String,
    pub name: String,
    pub last_visit: DateTime<Utc>,
    pub last_diagnosis: String,
    pub last_doctor: String,
    pub visit_count: usize,
}
