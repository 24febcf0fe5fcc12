// triage/src/lib.rs
//
// Pure rules for the clinic queue: urgency classification, booking state
// transitions, wait-time estimation, analytics, the patient journey view and
// the patient registry reducer. No I/O and no clock reads happen here; the
// caller supplies `now` so every rule is deterministic and unit-testable.

pub mod analytics;
pub mod classifier;
pub mod journey;
pub mod registry;
pub mod state_machine;
pub mod wait_time;

pub use analytics::{AnalyticsSnapshot, snapshot};
pub use classifier::{
    Classification, SymptomAssessment, assess_symptoms, classify_score, score_from_input,
    score_label,
};
pub use journey::{JourneyAdvice, journey_view};
pub use registry::build_registry;
pub use state_machine::{BookingAction, TransitionPlan, initial_state, plan_delay, plan_transition};
pub use wait_time::{CarePathEstimate, SlotEstimate, care_path, estimate_slot};
