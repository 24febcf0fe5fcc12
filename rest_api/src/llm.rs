// rest_api/src/llm.rs

use models::{ClinicError, ClinicResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

use crate::config::Settings;

/// Temperature for the conversational triage flow.
const TRIAGE_TEMPERATURE: f32 = 0.1;
/// Lower creativity for record explanations and summaries.
const EXPLAIN_TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 256;
const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Structured payload the triage chat flow expects back from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageReply {
    pub reply_message: String,
    #[serde(default)]
    pub show_booking: bool,
    #[serde(default)]
    pub urgency_score: Option<u8>,
    #[serde(default)]
    pub color_code: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub recommended_action: Option<String>,
}

/// Structured payload for the AI health summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub status: String,
    pub summary: String,
    pub tip: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint. Every public
/// method returns `Upstream` on failure; callers mask that behind the
/// deterministic fallback rather than surfacing it to the end user.
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(settings: &Settings) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");
        LlmClient {
            http,
            base_url: settings.llm_base_url.trim_end_matches('/').to_string(),
            api_key: settings.llm_api_key.clone(),
            model: settings.llm_model.clone(),
        }
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        json_mode: bool,
    ) -> ClinicResult<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens: MAX_TOKENS,
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("LLM request failed: {}", e);
                ClinicError::Upstream(e.to_string())
            })?
            .error_for_status()
            .map_err(|e| {
                error!("LLM returned an error status: {}", e);
                ClinicError::Upstream(e.to_string())
            })?;
        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ClinicError::Upstream(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ClinicError::Upstream("empty completion".to_string()))
    }

    /// Conversational triage turn: system persona plus the full message
    /// history, JSON mode on.
    pub async fn triage_chat(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> ClinicResult<TriageReply> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(history);
        let content = self.complete(&messages, TRIAGE_TEMPERATURE, true).await?;
        serde_json::from_str(&content).map_err(|e| {
            error!("LLM triage reply was not valid JSON: {}", e);
            ClinicError::Upstream(format!("malformed triage reply: {e}"))
        })
    }

    /// Free-text explanation of a prescription or record.
    pub async fn explain(&self, system_prompt: &str, user_content: &str) -> ClinicResult<String> {
        let messages = [
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_content),
        ];
        self.complete(&messages, EXPLAIN_TEMPERATURE, false).await
    }

    /// Structured health summary over a record history, JSON mode on.
    pub async fn health_summary(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> ClinicResult<HealthSummary> {
        let messages = [
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_content),
        ];
        let content = self.complete(&messages, EXPLAIN_TEMPERATURE, true).await?;
        serde_json::from_str(&content).map_err(|e| {
            error!("LLM health summary was not valid JSON: {}", e);
            ClinicError::Upstream(format!("malformed health summary: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_a_full_triage_reply() {
        let json = r#"{
            "reply_message": "Yoh! That is dangerous. You must see a doctor NOW.",
            "show_booking": true,
            "urgency_score": 9,
            "color_code": "red",
            "category": "Emergency",
            "recommended_action": "Go to the clinic immediately."
        }"#;
        let reply: TriageReply = serde_json::from_str(json).unwrap();
        assert!(reply.show_booking);
        assert_eq!(reply.urgency_score, Some(9));
        assert_eq!(reply.category.as_deref(), Some("Emergency"));
    }

    #[test]
    fn should_tolerate_missing_optional_fields() {
        let json = r#"{"reply_message": "Sawubona! How can I help?"}"#;
        let reply: TriageReply = serde_json::from_str(json).unwrap();
        assert!(!reply.show_booking);
        assert!(reply.urgency_score.is_none());
        assert!(reply.color_code.is_none());
    }

    #[test]
    fn should_reject_replies_without_a_message() {
        let json = r#"{"show_booking": false}"#;
        assert!(serde_json::from_str::<TriageReply>(json).is_err());
    }
}
