// triage/src/wait_time.rs

use chrono::NaiveTime;
use models::{SlotTime, UrgencyTier};
use serde::Serialize;

/// Minutes budgeted per patient ahead in the queue.
const MINUTES_PER_PATIENT: i64 = 15;
/// Longer consult budget once the clinic is backed up.
const BUSY_MINUTES_PER_PATIENT: i64 = 20;
/// Queue depth past which the clinic is considered delayed.
const BUSY_QUEUE_THRESHOLD: usize = 5;
/// Floor applied so nobody is told to arrive in under 15 minutes.
const MINIMUM_WAIT_MINUTES: i64 = 15;
/// Fixed travel allowance noted for taxi commuters.
const TAXI_EXTRA_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotEstimate {
    pub slot_time: SlotTime,
    pub wait_minutes: i64,
}

/// Estimated slot for a new booking given the current queue depth. Critical
/// cases get a slot of `now` with no queue-position delay; everyone else
/// waits 15 minutes per patient ahead, rounded to the nearest 5 and floored
/// at 15.
pub fn estimate_slot(queue_len: usize, tier: UrgencyTier, now: NaiveTime) -> SlotEstimate {
    if tier == UrgencyTier::Critical {
        return SlotEstimate {
            slot_time: SlotTime::At(now),
            wait_minutes: 0,
        };
    }
    let wait = queue_wait(queue_len, MINUTES_PER_PATIENT);
    SlotEstimate {
        slot_time: SlotTime::At(now).plus_minutes(wait),
        wait_minutes: wait,
    }
}

fn queue_wait(queue_len: usize, minutes_per_patient: i64) -> i64 {
    let raw = queue_len as i64 * minutes_per_patient;
    let rounded = ((raw + 2) / 5) * 5;
    rounded.max(MINIMUM_WAIT_MINUTES)
}

/// Care-path estimate shown before a patient travels in. Once the queue is
/// deeper than five the per-consult budget rises to 20 minutes and the clinic
/// reports itself delayed; taxi commuters get a fixed +10 minute travel note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarePathEstimate {
    pub clinic_status: &'static str,
    pub avg_consult_minutes: i64,
    pub wait_minutes: i64,
    pub slot_time: SlotTime,
    pub travel_note: Option<String>,
}

pub fn care_path(queue_len: usize, transport: Option<&str>, now: NaiveTime) -> CarePathEstimate {
    let (per_patient, clinic_status) = if queue_len > BUSY_QUEUE_THRESHOLD {
        (BUSY_MINUTES_PER_PATIENT, "Delayed")
    } else {
        (MINUTES_PER_PATIENT, "On Time")
    };
    let wait = queue_wait(queue_len, per_patient);
    let travel_note = transport
        .filter(|t| t.eq_ignore_ascii_case("taxi"))
        .map(|_| format!("Allow an extra {TAXI_EXTRA_MINUTES} minutes for taxi travel."));
    CarePathEstimate {
        clinic_status,
        avg_consult_minutes: per_patient,
        wait_minutes: wait,
        slot_time: SlotTime::At(now).plus_minutes(wait),
        travel_note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn should_floor_an_empty_queue_at_fifteen_minutes() {
        let est = estimate_slot(0, UrgencyTier::Low, at("08:00"));
        assert_eq!(est.wait_minutes, 15);
        assert_eq!(est.slot_time.to_string(), "08:15");
    }

    #[test]
    fn should_scale_with_queue_depth() {
        assert_eq!(estimate_slot(3, UrgencyTier::Low, at("08:00")).wait_minutes, 45);
        assert_eq!(estimate_slot(4, UrgencyTier::High, at("08:00")).wait_minutes, 60);
    }

    #[test]
    fn should_slot_critical_cases_immediately() {
        let est = estimate_slot(12, UrgencyTier::Critical, at("08:00"));
        assert_eq!(est.wait_minutes, 0);
        assert_eq!(est.slot_time.to_string(), "08:00");
    }

    #[test]
    fn should_report_on_time_for_a_shallow_queue() {
        let cp = care_path(3, None, at("09:00"));
        assert_eq!(cp.clinic_status, "On Time");
        assert_eq!(cp.avg_consult_minutes, 15);
        assert_eq!(cp.wait_minutes, 45);
        assert!(cp.travel_note.is_none());
    }

    #[test]
    fn should_report_delayed_past_five_in_the_queue() {
        let cp = care_path(6, None, at("09:00"));
        assert_eq!(cp.clinic_status, "Delayed");
        assert_eq!(cp.avg_consult_minutes, 20);
        assert_eq!(cp.wait_minutes, 120);
    }

    #[test]
    fn should_note_extra_travel_time_for_taxis() {
        let cp = care_path(1, Some("Taxi"), at("09:00"));
        assert!(cp.travel_note.as_deref().unwrap().contains("10 minutes"));
        let cp = care_path(1, Some("walking"), at("09:00"));
        assert!(cp.travel_note.is_none());
    }
}
