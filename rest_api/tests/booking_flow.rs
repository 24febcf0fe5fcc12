// rest_api/tests/booking_flow.rs
//
// End-to-end booking lifecycle over the real service layer and a temporary
// sled store: create, cancel, reject further actions, delete.

use std::sync::Arc;

use models::{BookingStatus, ClinicError, SlotTime};
use rest_api::service::{BookingService, NewBooking};
use storage::{QueueStore, SledStore};
use triage::BookingAction;

fn service() -> (BookingService, Arc<SledStore>) {
    let store = Arc::new(SledStore::temporary().unwrap());
    let queue: Arc<dyn QueueStore> = store.clone();
    (BookingService::new(queue), store)
}

fn booking(score: &str, symptoms: &str) -> NewBooking {
    NewBooking {
        patient_id: "patient-001".to_string(),
        patient_name: "Thabo Mbeki".to_string(),
        triage_score: score.to_string(),
        symptoms: symptoms.to_string(),
    }
}

#[tokio::test]
async fn urgent_booking_lifecycle() {
    let (service, _store) = service();

    // An orange ticket is High urgency: emergency path, concrete slot now.
    let confirmation = service.create_booking(booking("orange", "fever")).await.unwrap();
    assert!(confirmation.success);
    assert_eq!(confirmation.status, "Emergency En Route");

    let entry = service.list().await.unwrap().into_iter().next().unwrap();
    assert_eq!(entry.score, "High (7/10)");
    assert!(entry.urgent);
    assert_eq!(entry.status, BookingStatus::EmergencyEnRoute);
    assert!(entry.slot_time.is_concrete());
    // The confirmation must quote the slot that was actually stored, not a
    // queue estimate the emergency path ignores.
    assert_eq!(confirmation.assigned_time, entry.slot_time.to_string());

    // Cancelling clears the slot back to the sentinel.
    service
        .update_booking(&entry.id, BookingAction::Cancel)
        .await
        .unwrap();
    let cancelled = service.list().await.unwrap().into_iter().next().unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.slot_time, SlotTime::Unassigned);

    // A cancelled booking accepts nothing but delete.
    let err = service
        .update_booking(&entry.id, BookingAction::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, ClinicError::InvalidTransition(_)));

    // Delete removes it from the queue entirely.
    service
        .update_booking(&entry.id, BookingAction::Delete)
        .await
        .unwrap();
    assert!(service.list().await.unwrap().is_empty());

    // Deleting again is a NotFound, not a panic.
    let err = service
        .update_booking(&entry.id, BookingAction::Delete)
        .await
        .unwrap_err();
    assert!(matches!(err, ClinicError::NotFound(_)));
}

#[tokio::test]
async fn non_urgent_booking_waits_for_approval() {
    let (service, _store) = service();

    let confirmation = service.create_booking(booking("3", "sore ankle")).await.unwrap();
    assert_eq!(confirmation.status, "Pending Approval");
    // The estimate in the response is concrete even though the stored slot
    // stays on the sentinel.
    assert_ne!(confirmation.assigned_time, "--:--");

    let entry = service.list().await.unwrap().into_iter().next().unwrap();
    assert_eq!(entry.status, BookingStatus::PendingApproval);
    assert_eq!(entry.slot_time, SlotTime::Unassigned);
    assert_eq!(entry.score, "Low (3/10)");
    assert!(!entry.urgent);

    // Approval books a concrete slot.
    service
        .update_booking(&entry.id, BookingAction::Approve)
        .await
        .unwrap();
    let approved = service.list().await.unwrap().into_iter().next().unwrap();
    assert_eq!(approved.status, BookingStatus::Confirmed);
    assert!(approved.slot_time.is_concrete());
}

#[tokio::test]
async fn delay_touches_only_concrete_slots() {
    let (service, _store) = service();

    service.create_booking(booking("red", "chest pain")).await.unwrap();
    service.create_booking(booking("2", "rash")).await.unwrap();

    // Only the emergency entry has a concrete slot to push back.
    let delayed = service.delay_all().await.unwrap();
    assert_eq!(delayed, 1);

    let entries = service.list().await.unwrap();
    let emergency = entries.iter().find(|e| e.urgent).unwrap();
    assert_eq!(emergency.status, BookingStatus::Delayed);
    let pending = entries.iter().find(|e| !e.urgent).unwrap();
    assert_eq!(pending.status, BookingStatus::PendingApproval);
}
