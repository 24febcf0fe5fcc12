// triage/src/analytics.rs

use chrono::{DateTime, Timelike, Utc};
use models::{BookingStatus, QueueEntry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Clock hours the traffic chart covers, inclusive. Entries created outside
/// this window are dropped silently.
const TRAFFIC_FIRST_HOUR: u32 = 8;
const TRAFFIC_LAST_HOUR: u32 = 17;

/// Points docked from the efficiency score per delayed patient.
const DELAY_PENALTY: i64 = 5;

/// Fixed brand palette keyed by the leading word of the score label.
fn category_color(label: &str) -> &'static str {
    match label {
        "Critical" => "#ef4444",
        "High" => "#f97316",
        "Medium" => "#0d9488",
        "Low" | "Routine" => "#94a3b8",
        _ => "#cbd5e1",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub change: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourBucket {
    pub time: String,
    pub patients: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisSlice {
    pub name: String,
    pub value: u32,
    pub color: String,
}

/// Derived metrics over a queue snapshot. Pure; performs no writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total_patients: usize,
    pub critical_cases: usize,
    pub avg_wait_minutes: i64,
    pub efficiency_score: i64,
    pub metrics: Vec<Metric>,
    pub hourly_traffic: Vec<HourBucket>,
    pub diagnosis_data: Vec<DiagnosisSlice>,
}

pub fn snapshot(queue: &[QueueEntry], now: DateTime<Utc>) -> AnalyticsSnapshot {
    let total_patients = queue.len();
    let critical_cases = queue
        .iter()
        .filter(|p| p.urgent || p.score.contains("Critical"))
        .count();

    let mut wait_seconds: i64 = 0;
    let mut timed_entries: i64 = 0;
    let mut hours: BTreeMap<u32, u32> = (TRAFFIC_FIRST_HOUR..=TRAFFIC_LAST_HOUR)
        .map(|h| (h, 0))
        .collect();

    for p in queue {
        if let Some(created_at) = p.created_at {
            wait_seconds += (now - created_at).num_seconds();
            timed_entries += 1;
            if let Some(count) = hours.get_mut(&created_at.hour()) {
                *count += 1;
            }
        }
    }

    let avg_wait_minutes = if timed_entries > 0 {
        wait_seconds / 60 / timed_entries
    } else {
        0
    };

    let delayed_count = queue
        .iter()
        .filter(|p| p.status == BookingStatus::Delayed)
        .count() as i64;
    let efficiency_score = (100 - delayed_count * DELAY_PENALTY).max(0);

    let hourly_traffic = hours
        .into_iter()
        .map(|(h, patients)| HourBucket {
            time: format!("{h:02}:00"),
            patients,
        })
        .collect();

    // Pie slices keyed by the leading word of the score label
    // ("High" out of "High (8/10)").
    let mut categories: BTreeMap<String, u32> = BTreeMap::new();
    for p in queue {
        let label = p
            .score
            .split_whitespace()
            .next()
            .unwrap_or("Routine")
            .to_string();
        *categories.entry(label).or_insert(0) += 1;
    }
    let mut diagnosis_data: Vec<DiagnosisSlice> = categories
        .into_iter()
        .map(|(name, value)| DiagnosisSlice {
            color: category_color(&name).to_string(),
            name,
            value,
        })
        .collect();
    if diagnosis_data.is_empty() {
        diagnosis_data.push(DiagnosisSlice {
            name: "No Data".to_string(),
            value: 1,
            color: "#f1f5f9".to_string(),
        });
    }

    let metrics = vec![
        Metric {
            label: "Avg Wait Time".into(),
            value: format!("{avg_wait_minutes}m"),
            change: "Live".into(),
            kind: "time".into(),
        },
        Metric {
            label: "Active Queue".into(),
            value: total_patients.to_string(),
            change: "Live".into(),
            kind: "users".into(),
        },
        Metric {
            label: "Critical Cases".into(),
            value: critical_cases.to_string(),
            change: "Live".into(),
            kind: "alert".into(),
        },
        Metric {
            label: "Efficiency Score".into(),
            value: format!("{efficiency_score}%"),
            change: "Live".into(),
            kind: "activity".into(),
        },
    ];

    AnalyticsSnapshot {
        total_patients,
        critical_cases,
        avg_wait_minutes,
        efficiency_score,
        metrics,
        hourly_traffic,
        diagnosis_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use models::{SlotTime, UrgencyTier};

    fn entry(urgent: bool, score: &str, status: BookingStatus) -> QueueEntry {
        QueueEntry {
            id: "x".into(),
            patient_id: "p".into(),
            patient_name: "P".into(),
            tier: if urgent { UrgencyTier::High } else { UrgencyTier::Low },
            urgent,
            score: score.into(),
            status,
            slot_time: SlotTime::Unassigned,
            symptoms: String::new(),
            created_at: None,
            doctor_id: None,
            doctor_name: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    }

    #[test]
    fn should_count_critical_cases_by_flag_or_label() {
        let queue = vec![
            entry(true, "High (8/10)", BookingStatus::Waiting),
            entry(true, "High (7/10)", BookingStatus::Waiting),
            entry(false, "Low (2/10)", BookingStatus::Waiting),
            entry(false, "Medium (4/10)", BookingStatus::Waiting),
        ];
        let snap = snapshot(&queue, now());
        assert_eq!(snap.total_patients, 4);
        assert_eq!(snap.critical_cases, 2);

        let queue = vec![entry(false, "Critical (9/10)", BookingStatus::Waiting)];
        assert_eq!(snapshot(&queue, now()).critical_cases, 1);
    }

    #[test]
    fn should_emit_a_no_data_slice_for_an_empty_queue() {
        let snap = snapshot(&[], now());
        assert_eq!(snap.diagnosis_data.len(), 1);
        assert_eq!(snap.diagnosis_data[0].name, "No Data");
        assert_eq!(snap.diagnosis_data[0].value, 1);
        assert_eq!(snap.avg_wait_minutes, 0);
    }

    #[test]
    fn should_average_wait_over_timed_entries_only() {
        let mut a = entry(false, "Low (2/10)", BookingStatus::Waiting);
        a.created_at = Some(now() - Duration::minutes(30));
        let mut b = entry(false, "Low (2/10)", BookingStatus::Waiting);
        b.created_at = Some(now() - Duration::minutes(10));
        let untimed = entry(false, "Low (2/10)", BookingStatus::Waiting);

        let snap = snapshot(&[a, b, untimed], now());
        assert_eq!(snap.avg_wait_minutes, 20);
    }

    #[test]
    fn should_bucket_traffic_into_clinic_hours_and_drop_the_rest() {
        let mut morning = entry(false, "Low (2/10)", BookingStatus::Waiting);
        morning.created_at = Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 15, 0).unwrap());
        let mut midnight = entry(false, "Low (2/10)", BookingStatus::Waiting);
        midnight.created_at = Some(Utc.with_ymd_and_hms(2025, 3, 14, 2, 0, 0).unwrap());

        let snap = snapshot(&[morning, midnight], now());
        assert_eq!(snap.hourly_traffic.len(), 10);
        let nine = snap
            .hourly_traffic
            .iter()
            .find(|b| b.time == "09:00")
            .unwrap();
        assert_eq!(nine.patients, 1);
        let total: u32 = snap.hourly_traffic.iter().map(|b| b.patients).sum();
        assert_eq!(total, 1, "out-of-range hours are dropped");
    }

    #[test]
    fn should_dock_efficiency_per_delayed_patient() {
        let queue: Vec<QueueEntry> = (0..3)
            .map(|_| entry(false, "Low (2/10)", BookingStatus::Delayed))
            .collect();
        assert_eq!(snapshot(&queue, now()).efficiency_score, 85);

        let queue: Vec<QueueEntry> = (0..25)
            .map(|_| entry(false, "Low (2/10)", BookingStatus::Delayed))
            .collect();
        assert_eq!(snapshot(&queue, now()).efficiency_score, 0);
    }

    #[test]
    fn should_color_slices_from_the_fixed_palette() {
        let queue = vec![
            entry(true, "High (8/10)", BookingStatus::Waiting),
            entry(false, "Mystery (1/10)", BookingStatus::Waiting),
        ];
        let snap = snapshot(&queue, now());
        let high = snap.diagnosis_data.iter().find(|s| s.name == "High").unwrap();
        assert_eq!(high.color, "#f97316");
        let unknown = snap
            .diagnosis_data
            .iter()
            .find(|s| s.name == "Mystery")
            .unwrap();
        assert_eq!(unknown.color, "#cbd5e1");
    }
}
