// rest_api/src/handlers/admin.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use models::ClinicError;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::auth::RequireAuth;
use crate::{AppState, RestApiError};

/// Token lifetime for the demo login, in seconds.
const TOKEN_TTL_SECS: u64 = 60 * 60 * 24;

pub async fn read_root() -> Json<Value> {
    Json(json!({ "status": "Clinic API Online", "version": "0.1" }))
}

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "message": "Clinic API is healthy" })),
    )
}

pub async fn version() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "version": "0.1.0", "api_level": 1 })),
    )
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub subject: String,
}

/// Demo login: issues a bearer token for the given subject. Real identity
/// verification is the provider's job; this only exists so `require_auth`
/// mode can be exercised end to end.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, RestApiError> {
    if payload.subject.trim().is_empty() {
        return Err(RestApiError::InvalidInput("subject must not be empty".into()));
    }
    let token = security::issue_token(
        &payload.subject,
        state.settings.jwt_secret.as_bytes(),
        TOKEN_TTL_SECS,
    )
    .map_err(|e| RestApiError::Clinic(ClinicError::Unauthorized(e.to_string())))?;
    Ok(Json(json!({
        "token": token,
        "expires_in": TOKEN_TTL_SECS,
    })))
}

/// Destructive demo reset: wipes the queue, inserts the three demo rows and
/// re-seeds the prompt templates.
pub async fn seed_database(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> Result<Json<Value>, RestApiError> {
    state.bookings.reset_demo().await?;
    if let Err(e) = state.prompts.seed_defaults().await {
        // Prompt seeding failing is not fatal: the cache falls back to the
        // hard-coded defaults anyway.
        warn!("Failed to seed prompt templates: {}", e);
    }
    Ok(Json(json!({ "message": "Database seeded with demo data" })))
}
