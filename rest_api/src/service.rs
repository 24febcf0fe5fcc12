// rest_api/src/service.rs
//
// Thin service layer between the HTTP handlers and the stores. All status
// changes go through the state machine against freshly re-read state; the
// read-then-write is not transactional, which is an accepted limitation for
// concurrent updates to the same entry.

use chrono::Utc;
use models::{
    ClinicError, ClinicResult, MedicalRecord, NewMedicalRecord, NewQueueEntry, PatientSummary,
    QueueEntry,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{QueueStore, RecordsStore};
use tracing::info;
use triage::analytics::AnalyticsSnapshot;
use triage::journey::JourneyAdvice;
use triage::wait_time::CarePathEstimate;
use triage::{BookingAction, TransitionPlan};

/// A booking request as submitted by the intake flow.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub patient_id: String,
    pub patient_name: String,
    /// Raw triage score or color label ("red", "orange", "8", ...).
    pub triage_score: String,
    pub symptoms: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub success: bool,
    pub id: String,
    pub status: String,
    pub assigned_time: String,
    pub message: String,
}

pub struct BookingService {
    queue: Arc<dyn QueueStore>,
}

impl BookingService {
    pub fn new(queue: Arc<dyn QueueStore>) -> Self {
        BookingService { queue }
    }

    pub async fn list(&self) -> ClinicResult<Vec<QueueEntry>> {
        self.queue.list().await
    }

    /// Classifies the request, derives the initial state and persists the
    /// entry. The response carries the estimated slot; the stored slot stays
    /// on the sentinel until approval for non-urgent bookings.
    pub async fn create_booking(&self, booking: NewBooking) -> ClinicResult<BookingConfirmation> {
        let queue_len = self.queue.list().await?.len();
        let now = Utc::now();

        let classification = triage::classify_score(&booking.triage_score);
        let points = triage::score_from_input(&booking.triage_score, classification.tier);
        let label = triage::score_label(classification.tier, points);

        let (status, slot_time) = triage::initial_state(classification.urgent, now.time());
        let estimate = triage::estimate_slot(queue_len, classification.tier, now.time());

        let entry = NewQueueEntry {
            patient_id: booking.patient_id,
            patient_name: booking.patient_name,
            tier: classification.tier,
            urgent: classification.urgent,
            score: label,
            status,
            slot_time,
            symptoms: booking.symptoms,
            created_at: Some(now),
        };
        let id = self.queue.add(entry).await?;
        info!("Created booking {} with status {}", id, status);

        // Emergencies are told the slot that was actually stored (now);
        // routine bookings get the queue estimate while the stored slot
        // stays on the sentinel until approval.
        let assigned_time = if classification.urgent {
            slot_time.to_string()
        } else {
            estimate.slot_time.to_string()
        };
        let message = if classification.urgent {
            format!("Emergency booking confirmed for {assigned_time}. Team notified.")
        } else {
            format!("Booking received, estimated slot {assigned_time} pending approval.")
        };
        Ok(BookingConfirmation {
            success: true,
            id,
            status: status.to_string(),
            assigned_time,
            message,
        })
    }

    /// Re-reads the entry by id and applies the named transition. The
    /// cancelled guard lives in the state machine, never here or in a
    /// handler.
    pub async fn update_booking(&self, doc_id: &str, action: BookingAction) -> ClinicResult<String> {
        let entry = self
            .queue
            .get(doc_id)
            .await?
            .ok_or_else(|| ClinicError::NotFound(format!("booking {doc_id}")))?;

        match triage::plan_transition(&entry, &action, Utc::now().time())? {
            TransitionPlan::Update(delta) => {
                if !self.queue.update_by_id(doc_id, &delta).await? {
                    return Err(ClinicError::NotFound(format!("booking {doc_id}")));
                }
                info!("Applied {} to booking {}", action.name(), doc_id);
                let past = match action {
                    BookingAction::Approve => "approved",
                    BookingAction::Assign { .. } => "assigned to a doctor",
                    BookingAction::Cancel => "cancelled",
                    BookingAction::Delete => "removed",
                };
                Ok(format!("Booking {doc_id} {past}."))
            }
            TransitionPlan::Remove => {
                if !self.queue.delete_by_id(doc_id).await? {
                    return Err(ClinicError::NotFound(format!("booking {doc_id}")));
                }
                info!("Deleted booking {}", doc_id);
                Ok(format!("Booking {doc_id} removed."))
            }
        }
    }

    /// Demo feature: adds 15 minutes to every entry with a concrete slot and
    /// marks it Delayed. Returns the number of entries touched.
    pub async fn delay_all(&self) -> ClinicResult<usize> {
        let entries = self.queue.list().await?;
        let mut count = 0;
        for entry in &entries {
            if let Some(delta) = triage::plan_delay(entry) {
                if self.queue.update_by_id(&entry.id, &delta).await? {
                    count += 1;
                }
            }
        }
        info!("Simulated clinic delay: {} entries pushed back", count);
        Ok(count)
    }

    /// Journey view of a patient's entries, most recent first.
    pub async fn journey(&self, patient_id: &str) -> ClinicResult<Vec<JourneyAdvice>> {
        let mut mine: Vec<QueueEntry> = self
            .queue
            .list()
            .await?
            .into_iter()
            .filter(|e| e.patient_id == patient_id)
            .collect();
        mine.sort_by_key(|e| std::cmp::Reverse(e.created_at));
        Ok(mine.iter().map(triage::journey_view).collect())
    }

    pub async fn analytics(&self) -> ClinicResult<AnalyticsSnapshot> {
        let entries = self.queue.list().await?;
        Ok(triage::snapshot(&entries, Utc::now()))
    }

    pub async fn care_path(&self, transport: Option<&str>) -> ClinicResult<CarePathEstimate> {
        let queue_len = self.queue.list().await?.len();
        Ok(triage::care_path(queue_len, transport, Utc::now().time()))
    }

    /// Destructive demo reset of the queue.
    pub async fn reset_demo(&self) -> ClinicResult<()> {
        self.queue.wipe_and_seed(demo_queue_rows()).await
    }
}

/// The three demo rows the dashboard boots with.
fn demo_queue_rows() -> Vec<NewQueueEntry> {
    use models::{BookingStatus, SlotTime, UrgencyTier};
    vec![
        NewQueueEntry {
            patient_id: "920211...".into(),
            patient_name: "Thabo Mbeki".into(),
            tier: UrgencyTier::High,
            urgent: true,
            score: "High (8/10)".into(),
            status: BookingStatus::Waiting,
            slot_time: SlotTime::parse("08:15"),
            symptoms: "Persistent headache".into(),
            created_at: None,
        },
        NewQueueEntry {
            patient_id: "540105...".into(),
            patient_name: "Gogo Dlamini".into(),
            tier: UrgencyTier::Low,
            urgent: false,
            score: "Medium (4/10)".into(),
            status: BookingStatus::PendingApproval,
            slot_time: SlotTime::Unassigned,
            symptoms: "Follow-up visit".into(),
            created_at: None,
        },
        NewQueueEntry {
            patient_id: "880523...".into(),
            patient_name: "Sarah Jones".into(),
            tier: UrgencyTier::Low,
            urgent: false,
            score: "Low (1/10)".into(),
            status: BookingStatus::Confirmed,
            slot_time: SlotTime::parse("08:45"),
            symptoms: "Repeat prescription".into(),
            created_at: None,
        },
    ]
}

pub struct RecordsService {
    records: Arc<dyn RecordsStore>,
}

impl RecordsService {
    pub fn new(records: Arc<dyn RecordsStore>) -> Self {
        RecordsService { records }
    }

    /// Lists a patient's records, seeding the demo history first when the
    /// patient has none.
    pub async fn list_for_patient(&self, patient_id: &str) -> ClinicResult<Vec<MedicalRecord>> {
        let records = self.records.list_by_patient(patient_id).await?;
        if !records.is_empty() {
            return Ok(records);
        }
        self.records.seed_demo_records(patient_id).await?;
        self.records.list_by_patient(patient_id).await
    }

    pub async fn add(&self, record: NewMedicalRecord) -> ClinicResult<String> {
        self.records.add(record).await
    }

    /// Derived registry view over all records, recomputed on read.
    pub async fn registry(&self) -> ClinicResult<Vec<PatientSummary>> {
        let records = self.records.list_all().await?;
        Ok(triage::build_registry(&records))
    }
}
