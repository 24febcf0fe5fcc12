// storage/src/lib.rs
//
// Document-store collaborators for the clinic backend. The traits are the
// boundary the rest of the system sees; the sled implementation stands in
// for the hosted document store. Status updates are applied as deltas keyed
// by entry id (never by patient id, which is not unique across entries).

mod sled_store;

pub use sled_store::SledStore;

use async_trait::async_trait;
use models::{
    ClinicResult, MedicalRecord, NewMedicalRecord, NewQueueEntry, QueueDelta, QueueEntry,
};

/// Durable store of queue entries. The store is the sole writer of durable
/// state; callers propose deltas, the store applies them atomically per key.
#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn list(&self) -> ClinicResult<Vec<QueueEntry>>;
    async fn get(&self, id: &str) -> ClinicResult<Option<QueueEntry>>;
    /// Persists a new entry and returns the assigned id. Ids are unique and
    /// never reused after deletion.
    async fn add(&self, entry: NewQueueEntry) -> ClinicResult<String>;
    /// Applies a delta to the entry with the given id. Returns false when no
    /// such entry exists.
    async fn update_by_id(&self, id: &str, delta: &QueueDelta) -> ClinicResult<bool>;
    /// Applies a delta to the first entry matching the patient id.
    async fn update_by_patient_id(&self, patient_id: &str, delta: &QueueDelta)
    -> ClinicResult<bool>;
    async fn delete_by_id(&self, id: &str) -> ClinicResult<bool>;
    /// Removes the first entry matching the patient id.
    async fn delete_by_patient_id(&self, patient_id: &str) -> ClinicResult<bool>;
    /// Destructive demo reset: drops every entry and inserts the given ones.
    async fn wipe_and_seed(&self, entries: Vec<NewQueueEntry>) -> ClinicResult<()>;
}

/// Append-only store of consultation records.
#[async_trait]
pub trait RecordsStore: Send + Sync {
    async fn list_by_patient(&self, patient_id: &str) -> ClinicResult<Vec<MedicalRecord>>;
    async fn list_all(&self) -> ClinicResult<Vec<MedicalRecord>>;
    async fn add(&self, record: NewMedicalRecord) -> ClinicResult<String>;
    /// Inserts the canned demo history for a patient.
    async fn seed_demo_records(&self, patient_id: &str) -> ClinicResult<()>;
}

/// Store of system prompt templates, keyed by template id.
#[async_trait]
pub trait PromptStore: Send + Sync {
    async fn get_template(&self, id: &str) -> ClinicResult<Option<String>>;
    async fn put_template(&self, id: &str, text: &str) -> ClinicResult<()>;
}
