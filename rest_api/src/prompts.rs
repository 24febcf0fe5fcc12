// rest_api/src/prompts.rs

use std::collections::HashMap;
use std::sync::Arc;
use storage::PromptStore;
use tokio::sync::Mutex;
use tracing::warn;

pub const TRIAGE_TEMPLATE_ID: &str = "triage_nurse";
pub const SUMMARY_TEMPLATE_ID: &str = "health_summary";

/// Bound on cached templates. There is no invalidation; a stale template is
/// acceptable for the life of the process.
const MAX_CACHED_TEMPLATES: usize = 16;

/// Conversational triage persona. `{context_str}` is substituted per request.
const DEFAULT_TRIAGE_TEMPLATE: &str = r#"You are Nurse Nandi, a warm and respectful triage nurse at a South African community clinic.
{context_str}

RULES:
1. Check the conversation history before replying. Never greet twice. If you just flagged an emergency and the patient acknowledged it, reassure them instead of repeating the alert.
2. If the patient mentions crushing chest pain, trouble breathing, or a drooping face: stop asking questions, set show_booking to true and color_code to "red", and tell them to see a doctor NOW.
3. If the symptom is vague, ask one clarifying question. If they are just venting, listen; do not book.
4. Keep replies short and simple.

OUTPUT FORMAT (JSON ONLY):
{
  "reply_message": "String",
  "show_booking": boolean,
  "urgency_score": int (1-10) or null,
  "color_code": "red"/"orange"/"green" or null,
  "category": "Emergency"/"Urgent"/"Routine" or null,
  "recommended_action": "Short medical advice" or null
}"#;

/// Health-summary persona over a patient's recent records.
const DEFAULT_SUMMARY_TEMPLATE: &str = r#"You are a caring personal health assistant for a clinic patient.
Analyze their recent medical history and provide a short, warm, simple health update.

OUTPUT FORMAT (JSON):
{
  "status": "Stable" | "Recovering" | "Attention Needed",
  "summary": "2 sentences explaining their health trend in simple English.",
  "tip": "1 simple, actionable lifestyle tip based on their diagnosis."
}"#;

/// Record-explainer persona. Not templated; the explain flow never hit the
/// prompt store in the original either.
pub const EXPLAIN_SYSTEM_PROMPT: &str = "You are a helpful, empathetic medical assistant for a patient in a community clinic. \
Explain complex medical terms in simple, easy-to-understand English. \
Start with a warm greeting. Explain the diagnosis simply, then the medication instructions clearly \
(e.g. translate 'TDS' to '3 times a day'). Do NOT give new medical advice or change the prescription. \
Keep it to 3-4 sentences.";

/// Hard-coded fallback per known template id, used when the store is
/// unreachable or has no entry.
pub fn default_template(id: &str) -> &'static str {
    match id {
        TRIAGE_TEMPLATE_ID => DEFAULT_TRIAGE_TEMPLATE,
        SUMMARY_TEMPLATE_ID => DEFAULT_SUMMARY_TEMPLATE,
        _ => "You are a helpful clinic assistant.",
    }
}

/// Small read-through cache in front of the prompt store. Bounded, keyed by
/// template id, never invalidated.
pub struct PromptCache {
    store: Arc<dyn PromptStore>,
    cache: Mutex<HashMap<String, String>>,
}

impl PromptCache {
    pub fn new(store: Arc<dyn PromptStore>) -> Self {
        PromptCache {
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the template text for `id`, falling back to the hard-coded
    /// default when the store misses or errors. Never fails.
    pub async fn get(&self, id: &str) -> String {
        {
            let cache = self.cache.lock().await;
            if let Some(text) = cache.get(id) {
                return text.clone();
            }
        }
        match self.store.get_template(id).await {
            Ok(Some(text)) => {
                let mut cache = self.cache.lock().await;
                if cache.len() < MAX_CACHED_TEMPLATES {
                    cache.insert(id.to_string(), text.clone());
                }
                text
            }
            Ok(None) => default_template(id).to_string(),
            Err(e) => {
                warn!("Prompt store unavailable for template '{}': {}", id, e);
                default_template(id).to_string()
            }
        }
    }

    /// Writes the default templates into the store (demo reset).
    pub async fn seed_defaults(&self) -> models::ClinicResult<()> {
        for id in [TRIAGE_TEMPLATE_ID, SUMMARY_TEMPLATE_ID] {
            self.store.put_template(id, default_template(id)).await?;
        }
        self.cache.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::SledStore;

    #[tokio::test]
    async fn should_fall_back_to_defaults_on_a_store_miss() {
        let store = Arc::new(SledStore::temporary().unwrap());
        let cache = PromptCache::new(store);
        let text = cache.get(TRIAGE_TEMPLATE_ID).await;
        assert!(text.contains("{context_str}"));
        assert!(text.contains("show_booking"));
    }

    #[tokio::test]
    async fn should_read_through_and_cache_stored_templates() {
        let store = Arc::new(SledStore::temporary().unwrap());
        store
            .put_template(SUMMARY_TEMPLATE_ID, "custom summary prompt")
            .await
            .unwrap();
        let cache = PromptCache::new(store.clone());
        assert_eq!(cache.get(SUMMARY_TEMPLATE_ID).await, "custom summary prompt");

        // A later store write is not observed: acceptable staleness.
        store
            .put_template(SUMMARY_TEMPLATE_ID, "changed")
            .await
            .unwrap();
        assert_eq!(cache.get(SUMMARY_TEMPLATE_ID).await, "custom summary prompt");
    }

    #[tokio::test]
    async fn should_seed_the_known_templates() {
        let store = Arc::new(SledStore::temporary().unwrap());
        let cache = PromptCache::new(store.clone());
        cache.seed_defaults().await.unwrap();
        assert!(
            store
                .get_template(TRIAGE_TEMPLATE_ID)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .get_template(SUMMARY_TEMPLATE_ID)
                .await
                .unwrap()
                .is_some()
        );
    }
}
