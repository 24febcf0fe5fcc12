// triage/src/state_machine.rs

use chrono::NaiveTime;
use models::{BookingStatus, ClinicError, ClinicResult, QueueDelta, QueueEntry, SlotTime};

/// Minutes added to `now` when a booking is approved.
pub const APPROVE_OFFSET_MINUTES: i64 = 30;
/// Minutes added to `now` when a doctor is assigned.
pub const ASSIGN_OFFSET_MINUTES: i64 = 15;
/// Minutes added to every concrete slot by the bulk delay.
pub const DELAY_STEP_MINUTES: i64 = 15;

/// A staff- or system-triggered transition on a queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingAction {
    Approve,
    Assign {
        doctor_id: String,
        doctor_name: String,
    },
    Cancel,
    Delete,
}

impl BookingAction {
    pub fn name(&self) -> &'static str {
        match self {
            BookingAction::Approve => "approve",
            BookingAction::Assign { .. } => "assign",
            BookingAction::Cancel => "cancel",
            BookingAction::Delete => "delete",
        }
    }
}

/// The outcome the repository should apply: a delta keyed by id, or a hard
/// delete that removes the entity outright.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionPlan {
    Update(QueueDelta),
    Remove,
}

/// Initial state for a freshly created booking: emergencies are en route with
/// a slot of `now`, everything else waits for approval with no slot assigned.
pub fn initial_state(urgent: bool, now: NaiveTime) -> (BookingStatus, SlotTime) {
    if urgent {
        (BookingStatus::EmergencyEnRoute, SlotTime::At(now))
    } else {
        (BookingStatus::PendingApproval, SlotTime::Unassigned)
    }
}

/// Validates an action against the entry's current status and plans the
/// resulting mutation. The caller must pass freshly re-read state, not a
/// client-supplied snapshot: a cancelled entry admits no transition other
/// than delete, and that guard lives here, not per endpoint.
pub fn plan_transition(
    current: &QueueEntry,
    action: &BookingAction,
    now: NaiveTime,
) -> ClinicResult<TransitionPlan> {
    if current.status == BookingStatus::Cancelled && !matches!(action, BookingAction::Delete) {
        return Err(ClinicError::InvalidTransition(format!(
            "cannot {} booking {}: it has been cancelled",
            action.name(),
            current.id
        )));
    }

    let plan = match action {
        BookingAction::Approve => TransitionPlan::Update(QueueDelta {
            status: Some(BookingStatus::Confirmed),
            slot_time: Some(SlotTime::At(now).plus_minutes(APPROVE_OFFSET_MINUTES)),
            ..Default::default()
        }),
        BookingAction::Assign {
            doctor_id,
            doctor_name,
        } => TransitionPlan::Update(QueueDelta {
            status: Some(BookingStatus::WaitingForDoctor),
            slot_time: Some(SlotTime::At(now).plus_minutes(ASSIGN_OFFSET_MINUTES)),
            doctor_id: Some(doctor_id.clone()),
            doctor_name: Some(doctor_name.clone()),
        }),
        BookingAction::Cancel => TransitionPlan::Update(QueueDelta {
            status: Some(BookingStatus::Cancelled),
            slot_time: Some(SlotTime::Unassigned),
            ..Default::default()
        }),
        BookingAction::Delete => TransitionPlan::Remove,
    };
    Ok(plan)
}

/// Bulk-delay rule: only entries with a parseable concrete slot move; their
/// slot gains 15 minutes and the status becomes Delayed. Entries still on the
/// sentinel are skipped.
pub fn plan_delay(entry: &QueueEntry) -> Option<QueueDelta> {
    if !entry.slot_time.is_concrete() {
        return None;
    }
    Some(QueueDelta {
        status: Some(BookingStatus::Delayed),
        slot_time: Some(entry.slot_time.plus_minutes(DELAY_STEP_MINUTES)),
        ..Default::default()
    })
}
