// security/src/lib.rs
//
// Identity verification is a collaborator boundary: this crate only checks a
// bearer credential and hands back the subject, distinguishing an expired
// token from an otherwise invalid one so clients can prompt re-login rather
// than re-auth.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a clinic token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier (patient or staff uid).
    pub sub: String,
    /// Expiration time, seconds since the epoch.
    pub exp: u64,
    /// Issued at, seconds since the epoch.
    pub iat: u64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token has expired, please log in again")]
    TokenExpired,
    #[error("invalid authentication credentials: {0}")]
    InvalidToken(String),
}

/// Issues a token for the demo login flow.
pub fn issue_token(subject: &str, secret: &[u8], ttl_secs: u64) -> Result<String, AuthError> {
    let now = Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: subject.to_string(),
        exp: now + ttl_secs,
        iat: now,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Decodes and validates a bearer token, returning its claims.
pub fn verify_bearer_token(token: &str, secret: &[u8]) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-32b";

    #[test]
    fn should_verify_a_freshly_issued_token() {
        let token = issue_token("patient-42", SECRET, 3600).unwrap();
        let claims = verify_bearer_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "patient-42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn should_report_an_expired_token_distinctly() {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: "patient-42".into(),
            exp: now - 3600, // well past the default leeway
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        let err = verify_bearer_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn should_reject_a_token_signed_with_another_secret() {
        let token = issue_token("patient-42", b"some-other-secret-entirely-32bytes", 3600).unwrap();
        let err = verify_bearer_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn should_reject_garbage_tokens() {
        let err = verify_bearer_token("not.a.jwt", SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
