// storage/src/sled_store.rs

use async_trait::async_trait;
use chrono::{Duration, Utc};
use models::{
    ClinicError, ClinicResult, MedicalRecord, NewMedicalRecord, NewQueueEntry, QueueDelta,
    QueueEntry,
};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::{PromptStore, QueueStore, RecordsStore};

const QUEUE_TREE: &str = "queue";
const RECORDS_TREE: &str = "records";
const PROMPTS_TREE: &str = "prompts";

/// Sled-backed document store holding the queue, the medical records and the
/// prompt templates as named trees of JSON values.
pub struct SledStore {
    _db: sled::Db,
    queue: sled::Tree,
    records: sled::Tree,
    prompts: sled::Tree,
}

fn storage_err(e: impl std::fmt::Display) -> ClinicError {
    ClinicError::Storage(e.to_string())
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> ClinicResult<Self> {
        let path = path.as_ref();
        info!("Opening clinic document store at {:?}", path);
        let db = sled::open(path).map_err(storage_err)?;
        Self::from_db(db)
    }

    /// Ephemeral store for tests and throwaway demos.
    pub fn temporary() -> ClinicResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(storage_err)?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> ClinicResult<Self> {
        let queue = db.open_tree(QUEUE_TREE).map_err(storage_err)?;
        let records = db.open_tree(RECORDS_TREE).map_err(storage_err)?;
        let prompts = db.open_tree(PROMPTS_TREE).map_err(storage_err)?;
        Ok(SledStore {
            _db: db,
            queue,
            records,
            prompts,
        })
    }

    fn queue_entries(&self) -> ClinicResult<Vec<QueueEntry>> {
        let mut entries = Vec::new();
        for item in self.queue.iter() {
            let (_, value) = item.map_err(storage_err)?;
            entries.push(serde_json::from_slice(&value)?);
        }
        Ok(entries)
    }

    fn put_entry(&self, entry: &QueueEntry) -> ClinicResult<()> {
        let bytes = serde_json::to_vec(entry)?;
        self.queue
            .insert(entry.id.as_bytes(), bytes)
            .map_err(storage_err)?;
        Ok(())
    }
}

#[async_trait]
impl QueueStore for SledStore {
    async fn list(&self) -> ClinicResult<Vec<QueueEntry>> {
        let mut entries = self.queue_entries()?;
        // Stable queue order: oldest first, rows without a timestamp last.
        entries.sort_by_key(|e| (e.created_at.is_none(), e.created_at));
        Ok(entries)
    }

    async fn get(&self, id: &str) -> ClinicResult<Option<QueueEntry>> {
        match self.queue.get(id.as_bytes()).map_err(storage_err)? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    async fn add(&self, entry: NewQueueEntry) -> ClinicResult<String> {
        let id = Uuid::new_v4().to_string();
        let entry = entry.into_entry(id.clone());
        self.put_entry(&entry)?;
        Ok(id)
    }

    async fn update_by_id(&self, id: &str, delta: &QueueDelta) -> ClinicResult<bool> {
        let Some(mut entry) = self.get(id).await? else {
            return Ok(false);
        };
        delta.apply(&mut entry);
        self.put_entry(&entry)?;
        Ok(true)
    }

    async fn update_by_patient_id(
        &self,
        patient_id: &str,
        delta: &QueueDelta,
    ) -> ClinicResult<bool> {
        let entries = self.list().await?;
        match entries.iter().find(|e| e.patient_id == patient_id) {
            Some(entry) => self.update_by_id(&entry.id, delta).await,
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &str) -> ClinicResult<bool> {
        let removed = self.queue.remove(id.as_bytes()).map_err(storage_err)?;
        Ok(removed.is_some())
    }

    async fn delete_by_patient_id(&self, patient_id: &str) -> ClinicResult<bool> {
        let entries = self.list().await?;
        match entries.iter().find(|e| e.patient_id == patient_id) {
            Some(entry) => self.delete_by_id(&entry.id).await,
            None => Ok(false),
        }
    }

    async fn wipe_and_seed(&self, entries: Vec<NewQueueEntry>) -> ClinicResult<()> {
        self.queue.clear().map_err(storage_err)?;
        let count = entries.len();
        for entry in entries {
            QueueStore::add(self, entry).await?;
        }
        info!("Queue wiped and re-seeded with {} entries", count);
        Ok(())
    }
}

#[async_trait]
impl RecordsStore for SledStore {
    async fn list_by_patient(&self, patient_id: &str) -> ClinicResult<Vec<MedicalRecord>> {
        let mut records: Vec<MedicalRecord> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|r| r.patient_id == patient_id)
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn list_all(&self) -> ClinicResult<Vec<MedicalRecord>> {
        let mut records = Vec::new();
        for item in self.records.iter() {
            let (_, value) = item.map_err(storage_err)?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    async fn add(&self, record: NewMedicalRecord) -> ClinicResult<String> {
        let id = Uuid::new_v4().to_string();
        let record = record.into_record(id.clone());
        let bytes = serde_json::to_vec(&record)?;
        self.records
            .insert(record.id.as_bytes(), bytes)
            .map_err(storage_err)?;
        Ok(id)
    }

    async fn seed_demo_records(&self, patient_id: &str) -> ClinicResult<()> {
        info!("Seeding demo records for patient {}", patient_id);
        for record in demo_records(patient_id) {
            RecordsStore::add(self, record).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl PromptStore for SledStore {
    async fn get_template(&self, id: &str) -> ClinicResult<Option<String>> {
        match self.prompts.get(id.as_bytes()).map_err(storage_err)? {
            Some(value) => {
                let text = String::from_utf8(value.to_vec())
                    .map_err(|e| ClinicError::Storage(e.to_string()))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    async fn put_template(&self, id: &str, text: &str) -> ClinicResult<()> {
        self.prompts
            .insert(id.as_bytes(), text.as_bytes())
            .map_err(storage_err)?;
        Ok(())
    }
}

/// Canned consultation history used when a patient has no records yet.
fn demo_records(patient_id: &str) -> Vec<NewMedicalRecord> {
    let now = Utc::now();
    vec![
        NewMedicalRecord {
            patient_id: patient_id.to_string(),
            patient_name: "Gogo Dlamini".to_string(),
            date: now - Duration::days(90),
            doctor: "Dr. Nkosi".to_string(),
            diagnosis: "Hypertension (High Blood Pressure)".to_string(),
            meds: vec!["Amlodipine 5mg (Daily)".to_string()],
            notes: "BP slightly elevated at 145/90. Continue current dosage, reduce salt intake."
                .to_string(),
            record_type: "Chronic Checkup".to_string(),
        },
        NewMedicalRecord {
            patient_id: patient_id.to_string(),
            patient_name: "Gogo Dlamini".to_string(),
            date: now - Duration::days(14),
            doctor: "Dr. Zulu".to_string(),
            diagnosis: "Seasonal Influenza".to_string(),
            meds: vec![
                "Paracetamol 500mg (TDS)".to_string(),
                "Oral rehydration solution".to_string(),
            ],
            notes: "Rest and fluids. Return if fever persists beyond 3 days.".to_string(),
            record_type: "Consultation".to_string(),
        },
    ]
}
