// rest_api/src/handlers/navigator.rs

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use triage::analytics::AnalyticsSnapshot;
use triage::journey::JourneyAdvice;
use triage::wait_time::CarePathEstimate;

use crate::auth::RequireAuth;
use crate::{AppState, RestApiError};

/// POST /navigator/delay — demo feature: pushes every active appointment
/// back by 15 minutes and marks it Delayed.
pub async fn simulate_delay(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> Result<Json<Value>, RestApiError> {
    let count = state.bookings.delay_all().await?;
    Ok(Json(json!({
        "message": format!("Delayed {count} patients by 15 minutes.")
    })))
}

/// GET /navigator/status/{patient_id} — the patient's journey view, most
/// recent booking first.
pub async fn patient_journey(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<JourneyAdvice>>, RestApiError> {
    Ok(Json(state.bookings.journey(&patient_id).await?))
}

/// GET /navigator/analytics — derived dashboard metrics over the live queue.
pub async fn clinic_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSnapshot>, RestApiError> {
    Ok(Json(state.bookings.analytics().await?))
}

#[derive(Debug, Deserialize)]
pub struct CarePathQuery {
    pub transport: Option<String>,
}

/// GET /navigator/care-path/{patient_id}?transport=Taxi
pub async fn care_path(
    State(state): State<AppState>,
    Path(_patient_id): Path<String>,
    Query(query): Query<CarePathQuery>,
) -> Result<Json<CarePathEstimate>, RestApiError> {
    Ok(Json(
        state.bookings.care_path(query.transport.as_deref()).await?,
    ))
}
