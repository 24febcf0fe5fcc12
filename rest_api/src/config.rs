// rest_api/src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;

/// Runtime configuration for the clinic backend. Defaults are suitable for a
/// local demo; every field can be overridden through `CLINIC_*` environment
/// variables (loaded from `.env` via dotenv at startup).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Directory for the sled document store.
    pub data_dir: String,
    /// Base URL of the OpenAI-compatible chat-completions endpoint.
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub jwt_secret: String,
    /// When true, mutating routes demand a valid bearer token.
    pub require_auth: bool,
}

pub fn load_settings() -> Result<Settings> {
    let cfg = config::Config::builder()
        .set_default("host", "127.0.0.1")?
        .set_default("port", 8000)?
        .set_default("data_dir", "clinic_data")?
        .set_default("llm_base_url", "https://api.groq.com/openai/v1")?
        .set_default("llm_api_key", "")?
        .set_default("llm_model", "llama-3.1-8b-instant")?
        .set_default("jwt_secret", "dev-only-secret-change-me-before-deploy")?
        .set_default("require_auth", false)?
        .add_source(config::Environment::with_prefix("CLINIC").try_parsing(true))
        .build()
        .context("Failed to build configuration")?;

    cfg.try_deserialize()
        .context("Failed to parse configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_load_defaults_without_any_environment() {
        // Scrub any ambient overrides so the defaults are actually exercised.
        for (key, _) in std::env::vars() {
            if key.starts_with("CLINIC_") {
                unsafe { std::env::remove_var(&key) };
            }
        }
        let settings = load_settings().unwrap();
        assert_eq!(settings.port, 8000);
        assert!(!settings.require_auth);
        assert_eq!(settings.llm_model, "llama-3.1-8b-instant");
    }
}
