// triage/src/registry.rs

use models::{MedicalRecord, PatientSummary};
use std::collections::HashMap;

/// Placeholder name the intake flow writes when a patient's name is unknown.
const PLACEHOLDER_NAME: &str = "Unknown";

fn is_placeholder(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(PLACEHOLDER_NAME)
}

/// Derives the patient registry view from the record history: one row per
/// distinct patient id, carrying the most informative name and the most
/// recent visit date, diagnosis and doctor.
///
/// The name merge is a two-key reducer: a non-placeholder name always beats a
/// placeholder regardless of date; among names of equal placeholder-ness the
/// later record wins. No further tie-breaks.
pub fn build_registry(records: &[MedicalRecord]) -> Vec<PatientSummary> {
    struct Acc {
        summary: PatientSummary,
        name_date: chrono::DateTime<chrono::Utc>,
    }

    let mut by_patient: HashMap<&str, Acc> = HashMap::new();

    for record in records {
        match by_patient.get_mut(record.patient_id.as_str()) {
            None => {
                by_patient.insert(
                    record.patient_id.as_str(),
                    Acc {
                        summary: PatientSummary {
                            patient_id: record.patient_id.clone(),
                            name: record.patient_name.clone(),
                            last_visit: record.date,
                            last_diagnosis: record.diagnosis.clone(),
                            last_doctor: record.doctor.clone(),
                            visit_count: 1,
                        },
                        name_date: record.date,
                    },
                );
            }
            Some(acc) => {
                acc.summary.visit_count += 1;
                if record.date > acc.summary.last_visit {
                    acc.summary.last_visit = record.date;
                    acc.summary.last_diagnosis = record.diagnosis.clone();
                    acc.summary.last_doctor = record.doctor.clone();
                }
                let candidate_rank = (!is_placeholder(&record.patient_name), record.date);
                let current_rank = (!is_placeholder(&acc.summary.name), acc.name_date);
                if candidate_rank > current_rank {
                    acc.summary.name = record.patient_name.clone();
                    acc.name_date = record.date;
                }
            }
        }
    }

    let mut rows: Vec<PatientSummary> = by_patient.into_values().map(|a| a.summary).collect();
    rows.sort_by(|a, b| b.last_visit.cmp(&a.last_visit));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(patient_id: &str, name: &str, day: u32, diagnosis: &str) -> MedicalRecord {
        MedicalRecord {
            id: format!("r-{patient_id}-{day}"),
            patient_id: patient_id.into(),
            patient_name: name.into(),
            date: Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap(),
            doctor: "Dr. Zulu".into(),
            diagnosis: diagnosis.into(),
            meds: vec![],
            notes: String::new(),
            record_type: "Consultation".into(),
        }
    }

    #[test]
    fn should_prefer_a_real_name_over_a_newer_placeholder() {
        let records = vec![
            record("p1", "Gogo Dlamini", 1, "Hypertension"),
            record("p1", "Unknown", 20, "Flu"),
        ];
        let rows = build_registry(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Gogo Dlamini");
        // Visit fields still come from the most recent record.
        assert_eq!(rows[0].last_diagnosis, "Flu");
        assert_eq!(rows[0].visit_count, 2);
    }

    #[test]
    fn should_prefer_the_later_of_two_real_names() {
        let records = vec![
            record("p1", "G. Dlamini", 1, "Hypertension"),
            record("p1", "Gogo Dlamini", 5, "Checkup"),
        ];
        let rows = build_registry(&records);
        assert_eq!(rows[0].name, "Gogo Dlamini");
    }

    #[test]
    fn should_keep_a_placeholder_when_nothing_better_exists() {
        let records = vec![record("p1", "Unknown", 3, "Flu")];
        let rows = build_registry(&records);
        assert_eq!(rows[0].name, "Unknown");
    }

    #[test]
    fn should_sort_patients_by_most_recent_visit() {
        let records = vec![
            record("p1", "Thabo", 2, "Flu"),
            record("p2", "Sarah", 10, "Asthma"),
            record("p3", "Lindiwe", 6, "Checkup"),
        ];
        let rows = build_registry(&records);
        let ids: Vec<&str> = rows.iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3", "p1"]);
    }
}
