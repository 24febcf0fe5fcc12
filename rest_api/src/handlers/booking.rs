// rest_api/src/handlers/booking.rs

use axum::Json;
use axum::extract::State;
use models::QueueEntry;
use serde::Deserialize;
use serde_json::{Value, json};
use triage::BookingAction;

use crate::auth::RequireAuth;
use crate::service::{BookingConfirmation, NewBooking};
use crate::{AppState, RestApiError};

/// GET /queue — the live clinic queue.
pub async fn read_queue(
    State(state): State<AppState>,
) -> Result<Json<Vec<QueueEntry>>, RestApiError> {
    Ok(Json(state.bookings.list().await?))
}

/// POST /booking/create
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<NewBooking>,
) -> Result<Json<BookingConfirmation>, RestApiError> {
    Ok(Json(state.bookings.create_booking(payload).await?))
}

#[derive(Debug, Deserialize)]
pub struct AssignPayload {
    pub doctor_id: String,
    pub doctor_name: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingUpdateRequest {
    pub doc_id: String,
    /// One of "approve", "assign", "cancel", "delete".
    pub action: String,
    #[serde(default)]
    pub payload: Option<AssignPayload>,
}

impl BookingUpdateRequest {
    fn into_action(self) -> Result<(String, BookingAction), RestApiError> {
        let action = match self.action.as_str() {
            "approve" => BookingAction::Approve,
            "assign" => {
                let payload = self.payload.ok_or_else(|| {
                    RestApiError::InvalidInput(
                        "assign requires a payload with doctor_id and doctor_name".to_string(),
                    )
                })?;
                BookingAction::Assign {
                    doctor_id: payload.doctor_id,
                    doctor_name: payload.doctor_name,
                }
            }
            "cancel" => BookingAction::Cancel,
            "delete" => BookingAction::Delete,
            other => {
                return Err(RestApiError::InvalidInput(format!(
                    "unknown booking action '{other}'"
                )));
            }
        };
        Ok((self.doc_id, action))
    }
}

/// POST /booking/update — staff-issued status transition, validated against
/// freshly re-read state by the service.
pub async fn update_booking(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(payload): Json<BookingUpdateRequest>,
) -> Result<Json<Value>, RestApiError> {
    let (doc_id, action) = payload.into_action()?;
    let message = state.bookings.update_booking(&doc_id, action).await?;
    Ok(Json(json!({ "status": "success", "message": message })))
}
