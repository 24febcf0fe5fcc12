// models/src/lib.rs

pub mod errors;
pub mod queue;
pub mod records;

pub use errors::{ClinicError, ClinicResult};
pub use queue::{
    BookingStatus, NewQueueEntry, QueueDelta, QueueEntry, SlotTime, UrgencyTier,
};
pub use records::{MedicalRecord, NewMedicalRecord, PatientSummary};
