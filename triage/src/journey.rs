// triage/src/journey.rs

use models::queue::SLOT_UNASSIGNED;
use models::{BookingStatus, QueueEntry};
use serde::Serialize;

/// User-facing rendering of a queue entry for the patient journey screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyAdvice {
    pub id: String,
    pub status: String,
    pub symptoms: String,
    pub estimated_time: String,
    pub advice: String,
    pub color_code: String,
    pub ticket_score: String,
    pub queue_position: u32,
}

struct AdviceRule {
    applies: fn(&QueueEntry) -> bool,
    color: &'static str,
    advice: &'static str,
    hide_time: bool,
}

/// Ordered predicate table; the first matching rule decides color and advice.
/// Order is the priority contract: a delayed emergency reads as delayed, and
/// a pending entry never leaks a concrete time.
const ADVICE_RULES: &[AdviceRule] = &[
    AdviceRule {
        applies: |e| e.status == BookingStatus::Delayed,
        color: "red",
        advice: "\u{26a0} CLINIC DELAYED. We apologize for the wait.",
        hide_time: false,
    },
    AdviceRule {
        applies: |e| e.status == BookingStatus::PendingApproval,
        color: "gray",
        advice: "Pending approval. Please be patient.",
        hide_time: true,
    },
    AdviceRule {
        applies: |e| {
            e.urgent || e.score.contains("Critical") || e.status == BookingStatus::EmergencyEnRoute
        },
        color: "red",
        advice: "Emergency Team Notified. Proceed immediately.",
        hide_time: false,
    },
    AdviceRule {
        applies: |e| e.status == BookingStatus::Confirmed,
        color: "teal",
        advice: "Appointment set. Please read details and don't miss your next appointment.",
        hide_time: false,
    },
    AdviceRule {
        applies: |e| e.status == BookingStatus::Cancelled,
        color: "gray",
        advice: "This appointment has been cancelled.",
        hide_time: false,
    },
    AdviceRule {
        applies: |e| e.status == BookingStatus::Waiting,
        color: "orange",
        advice: "You are in the queue.",
        hide_time: false,
    },
];

const DEFAULT_COLOR: &str = "green";
const DEFAULT_ADVICE: &str = "Please arrive on time.";

pub fn journey_view(entry: &QueueEntry) -> JourneyAdvice {
    let (color, advice, hide_time) = ADVICE_RULES
        .iter()
        .find(|rule| (rule.applies)(entry))
        .map(|rule| (rule.color, rule.advice, rule.hide_time))
        .unwrap_or((DEFAULT_COLOR, DEFAULT_ADVICE, false));

    JourneyAdvice {
        id: entry.id.clone(),
        status: entry.status.to_string(),
        symptoms: if entry.symptoms.is_empty() {
            "General Checkup".to_string()
        } else {
            entry.symptoms.clone()
        },
        estimated_time: if hide_time {
            SLOT_UNASSIGNED.to_string()
        } else {
            entry.slot_time.to_string()
        },
        advice: advice.to_string(),
        color_code: color.to_string(),
        ticket_score: entry.score.clone(),
        queue_position: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{SlotTime, UrgencyTier};

    fn entry(status: BookingStatus, urgent: bool, score: &str, slot: &str) -> QueueEntry {
        QueueEntry {
            id: "j-1".into(),
            patient_id: "p".into(),
            patient_name: "Sarah Jones".into(),
            tier: if urgent { UrgencyTier::Critical } else { UrgencyTier::Low },
            urgent,
            score: score.into(),
            status,
            slot_time: SlotTime::parse(slot),
            symptoms: "headache".into(),
            created_at: None,
            doctor_id: None,
            doctor_name: None,
        }
    }

    #[test]
    fn should_rank_delayed_above_urgent() {
        let e = entry(BookingStatus::Delayed, true, "Critical (9/10)", "10:00");
        let view = journey_view(&e);
        assert_eq!(view.color_code, "red");
        assert!(view.advice.contains("CLINIC DELAYED"));
    }

    #[test]
    fn should_hide_the_time_while_pending() {
        let e = entry(BookingStatus::PendingApproval, false, "Low (2/10)", "10:00");
        let view = journey_view(&e);
        assert_eq!(view.color_code, "gray");
        assert_eq!(view.estimated_time, "--:--");
    }

    #[test]
    fn should_flag_emergencies_red() {
        let e = entry(BookingStatus::EmergencyEnRoute, true, "Critical (9/10)", "09:00");
        let view = journey_view(&e);
        assert_eq!(view.color_code, "red");
        assert!(view.advice.contains("Emergency Team"));
        assert_eq!(view.estimated_time, "09:00");
    }

    #[test]
    fn should_flag_a_critical_label_even_without_the_urgent_bit() {
        let e = entry(BookingStatus::Waiting, false, "Critical (10/10)", "09:00");
        assert_eq!(journey_view(&e).color_code, "red");
    }

    #[test]
    fn should_render_confirmed_teal_and_cancelled_gray() {
        let e = entry(BookingStatus::Confirmed, false, "Low (2/10)", "11:00");
        assert_eq!(journey_view(&e).color_code, "teal");
        let e = entry(BookingStatus::Cancelled, false, "Low (2/10)", "--:--");
        let view = journey_view(&e);
        assert_eq!(view.color_code, "gray");
        assert!(view.advice.contains("cancelled"));
    }

    #[test]
    fn should_render_waiting_orange_and_default_green() {
        let e = entry(BookingStatus::Waiting, false, "Low (2/10)", "11:00");
        assert_eq!(journey_view(&e).color_code, "orange");
        let e = entry(BookingStatus::WaitingForDoctor, false, "Low (2/10)", "11:00");
        let view = journey_view(&e);
        assert_eq!(view.color_code, "green");
        assert_eq!(view.advice, "Please arrive on time.");
    }

    #[test]
    fn should_substitute_a_generic_label_for_empty_symptoms() {
        let mut e = entry(BookingStatus::Waiting, false, "Low (2/10)", "11:00");
        e.symptoms.clear();
        assert_eq!(journey_view(&e).symptoms, "General Checkup");
    }
}
