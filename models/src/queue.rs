// models/src/queue.rs

use chrono::{DateTime, NaiveTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sentinel shown to clients while no concrete slot has been assigned.
pub const SLOT_UNASSIGNED: &str = "--:--";

const SLOT_FORMAT: &str = "%H:%M";

/// Discrete urgency tier derived from a triage score or symptom text.
/// Never set directly by a client, and immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyTier {
    Critical,
    High,
    Low,
}

impl UrgencyTier {
    /// `urgent` is true iff the tier is Critical or High.
    pub fn is_urgent(&self) -> bool {
        matches!(self, UrgencyTier::Critical | UrgencyTier::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "Critical",
            UrgencyTier::High => "High",
            UrgencyTier::Low => "Low",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queue entry status. Serialized as the human-readable strings the
/// dashboard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    #[serde(rename = "Emergency En Route")]
    EmergencyEnRoute,
    Confirmed,
    #[serde(rename = "Waiting for Doctor")]
    WaitingForDoctor,
    Waiting,
    Delayed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingApproval => "Pending Approval",
            BookingStatus::EmergencyEnRoute => "Emergency En Route",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::WaitingForDoctor => "Waiting for Doctor",
            BookingStatus::Waiting => "Waiting",
            BookingStatus::Delayed => "Delayed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wall-clock appointment slot: either the `--:--` sentinel or a concrete
/// `HH:MM` time. Serialized as the display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotTime {
    #[default]
    Unassigned,
    At(NaiveTime),
}

impl SlotTime {
    /// Lenient parse: anything that is not a valid `HH:MM` reads as the
    /// sentinel, mirroring how seeded rows with junk times were tolerated.
    pub fn parse(s: &str) -> Self {
        NaiveTime::parse_from_str(s.trim(), SLOT_FORMAT)
            .map(SlotTime::At)
            .unwrap_or(SlotTime::Unassigned)
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, SlotTime::At(_))
    }

    /// Adds minutes to a concrete slot (wrapping past midnight); the
    /// sentinel stays the sentinel.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        match self {
            SlotTime::Unassigned => SlotTime::Unassigned,
            SlotTime::At(t) => SlotTime::At(*t + chrono::Duration::minutes(minutes)),
        }
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotTime::Unassigned => f.write_str(SLOT_UNASSIGNED),
            SlotTime::At(t) => write!(f, "{}", t.format(SLOT_FORMAT)),
        }
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer).map_err(DeError::custom)?;
        Ok(SlotTime::parse(&s))
    }
}

/// One active or historical walk-in/booking record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Store-assigned id; unique and never reused after deletion.
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub tier: UrgencyTier,
    pub urgent: bool,
    /// Display label, e.g. "High (7/10)". Analytics groups by its leading word.
    pub score: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub slot_time: SlotTime,
    pub symptoms: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
}

/// A queue entry as submitted for creation, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQueueEntry {
    pub patient_id: String,
    pub patient_name: String,
    pub tier: UrgencyTier,
    pub urgent: bool,
    pub score: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub slot_time: SlotTime,
    pub symptoms: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewQueueEntry {
    pub fn into_entry(self, id: String) -> QueueEntry {
        QueueEntry {
            id,
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            tier: self.tier,
            urgent: self.urgent,
            score: self.score,
            status: self.status,
            slot_time: self.slot_time,
            symptoms: self.symptoms,
            created_at: self.created_at,
            doctor_id: None,
            doctor_name: None,
        }
    }
}

/// A partial update proposed by the state machine; the store applies it
/// atomically keyed by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueDelta {
    pub status: Option<BookingStatus>,
    pub slot_time: Option<SlotTime>,
    pub doctor_id: Option<String>,
    pub doctor_name: Option<String>,
}

impl QueueDelta {
    pub fn apply(&self, entry: &mut QueueEntry) {
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(slot) = self.slot_time {
            entry.slot_time = slot;
        }
        if let Some(ref doctor_id) = self.doctor_id {
            entry.doctor_id = Some(doctor_id.clone());
        }
        if let Some(ref doctor_name) = self.doctor_name {
            entry.doctor_name = Some(doctor_name.clone());
        }
    }
}
