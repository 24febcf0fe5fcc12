// rest_api/src/handlers/records.rs

use axum::Json;
use axum::extract::{Path, State};
use models::{MedicalRecord, NewMedicalRecord, PatientSummary};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::auth::RequireAuth;
use crate::llm::HealthSummary;
use crate::prompts::{EXPLAIN_SYSTEM_PROMPT, SUMMARY_TEMPLATE_ID};
use crate::{AppState, RestApiError};

/// GET /records/list/{patient_id} — auto-seeds demo records when the patient
/// has none, then lists newest first.
pub async fn list_records(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<MedicalRecord>>, RestApiError> {
    Ok(Json(state.records.list_for_patient(&patient_id).await?))
}

/// GET /records/all-patients — registry view derived from the record history.
pub async fn all_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientSummary>>, RestApiError> {
    Ok(Json(state.records.registry().await?))
}

/// POST /records/create
pub async fn create_record(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(record): Json<NewMedicalRecord>,
) -> Result<Json<Value>, RestApiError> {
    let id = state.records.add(record).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub diagnosis: String,
    pub meds: Vec<String>,
    pub notes: String,
}

const EXPLAIN_FALLBACK: &str = "Sorry, I cannot explain this right now. Please ask the nurse.";

/// POST /records/explain — real-time AI explanation of a record. Generation
/// failures are never surfaced; the patient gets a static apology instead.
pub async fn explain_record(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Json<Value> {
    let user_content = format!(
        "Diagnosis: {}\nMedications: {}\nDoctor's Notes: {}\n\nPlease explain this to the patient.",
        request.diagnosis,
        request.meds.join(", "),
        request.notes
    );

    let explanation = match state.llm.explain(EXPLAIN_SYSTEM_PROMPT, &user_content).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Record explanation unavailable: {}", e);
            EXPLAIN_FALLBACK.to_string()
        }
    };

    Json(json!({ "explanation": explanation }))
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub patient_id: String,
}

fn fallback_summary() -> HealthSummary {
    HealthSummary {
        status: "Stable".to_string(),
        summary: "I could not review your records just now, but your history is safely stored."
            .to_string(),
        tip: "Keep taking your medication as prescribed and ask the nurse at your next visit."
            .to_string(),
    }
}

/// POST /records/health-summary — AI summary over the patient's record
/// history, with a static fallback when generation fails.
pub async fn health_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<HealthSummary>, RestApiError> {
    let records = state.records.list_for_patient(&request.patient_id).await?;

    let mut history = String::new();
    for record in &records {
        history.push_str(&format!(
            "{}: {} ({}). Meds: {}. Notes: {}\n",
            record.date.format("%Y-%m-%d"),
            record.diagnosis,
            record.record_type,
            record.meds.join(", "),
            record.notes
        ));
    }

    let system_prompt = state.prompts.get(SUMMARY_TEMPLATE_ID).await;
    let user_content = format!("Recent medical history:\n{history}");

    let summary = match state.llm.health_summary(&system_prompt, &user_content).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Health summary unavailable: {}", e);
            fallback_summary()
        }
    };

    Ok(Json(summary))
}
