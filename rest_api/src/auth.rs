// rest_api/src/auth.rs

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use models::ClinicError;
use security::AuthError;

use crate::{AppState, RestApiError};

fn auth_to_clinic(e: AuthError) -> ClinicError {
    match e {
        AuthError::TokenExpired => ClinicError::TokenExpired,
        AuthError::InvalidToken(msg) => ClinicError::Unauthorized(msg),
    }
}

/// Extractor guarding mutating routes. A no-op while `require_auth` is off
/// (the demo default); otherwise the bearer token must verify.
pub struct RequireAuth {
    pub subject: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = RestApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.settings.require_auth {
            return Ok(RequireAuth { subject: None });
        }
        let token = bearer_token(parts)
            .ok_or_else(|| ClinicError::Unauthorized("missing bearer token".to_string()))?;
        let claims = security::verify_bearer_token(token, state.settings.jwt_secret.as_bytes())
            .map_err(auth_to_clinic)?;
        Ok(RequireAuth {
            subject: Some(claims.sub),
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
