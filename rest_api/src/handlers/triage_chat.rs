// rest_api/src/handlers/triage_chat.rs
//
// Conversational triage. The LLM drives the conversation; every failure mode
// (network, malformed JSON, missing template) degrades to the deterministic
// keyword classifier so the patient always gets an answer.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::{info, warn};
use triage::assess_symptoms;

use crate::AppState;
use crate::llm::{ChatMessage, TriageReply};
use crate::prompts::TRIAGE_TEMPLATE_ID;

#[derive(Debug, Deserialize)]
pub struct TriageRequest {
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub history: Vec<ChatMessage>,
}

fn context_str(name: &str, age: Option<u8>, gender: Option<&str>) -> String {
    let mut context = format!("You are speaking to {name}");
    match age {
        Some(age) => context.push_str(&format!(", who is {age} years old")),
        None => context.push_str(" (Age unknown)"),
    }
    if let Some(gender) = gender {
        context.push_str(&format!(" ({gender})"));
    }
    context.push('.');
    context
}

/// Deterministic reply built from the keyword classifier over the latest
/// patient message.
fn fallback_reply(history: &[ChatMessage]) -> TriageReply {
    let last_user = history
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or("");
    let assessment = assess_symptoms(last_user);
    TriageReply {
        reply_message: format!(
            "Eish, my connection is a bit slow, so I checked your symptoms myself. {}",
            assessment.reasoning
        ),
        show_booking: assessment.tier.is_urgent(),
        urgency_score: Some(assessment.urgency_score),
        color_code: Some(assessment.color_code.to_string()),
        category: Some(assessment.category.to_string()),
        recommended_action: Some(assessment.recommended_action.to_string()),
    }
}

/// POST /triage/assess
pub async fn assess_patient(
    State(state): State<AppState>,
    Json(request): Json<TriageRequest>,
) -> Json<TriageReply> {
    let name = request.patient_name.as_deref().unwrap_or("Patient");
    info!(
        "Triage chat from {} ({} messages)",
        name,
        request.history.len()
    );

    let template = state.prompts.get(TRIAGE_TEMPLATE_ID).await;
    let system_prompt = template.replace(
        "{context_str}",
        &context_str(name, request.age, request.gender.as_deref()),
    );

    match state.llm.triage_chat(&system_prompt, &request.history).await {
        Ok(reply) => Json(reply),
        Err(e) => {
            warn!("Triage generation failed, using keyword fallback: {}", e);
            Json(fallback_reply(&request.history))
        }
    }
}
