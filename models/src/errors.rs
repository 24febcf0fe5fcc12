// models/src/errors.rs

use thiserror::Error;

/// Errors shared across the clinic backend. Every failure is scoped to the
/// request that triggered it; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum ClinicError {
    #[error("{0} was not found")]
    NotFound(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("token has expired, please log in again")]
    TokenExpired,
    #[error("upstream unavailable: {0}")]
    Upstream(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type ClinicResult<T> = Result<T, ClinicError>;
