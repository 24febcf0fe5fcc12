// rest_api/src/lib.rs

use axum::{
    Json, Router,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use models::ClinicError;
use serde_json::json;
use std::sync::Arc;
use storage::{PromptStore, QueueStore, RecordsStore, SledStore};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod auth;
pub mod config;
pub mod handlers;
pub mod llm;
pub mod prompts;
pub mod service;

use crate::config::Settings;
use crate::llm::LlmClient;
use crate::prompts::PromptCache;
use crate::service::{BookingService, RecordsService};

/// REST API error; converts straight into an HTTP response with a JSON body.
#[derive(Debug, Error)]
pub enum RestApiError {
    #[error(transparent)]
    Clinic(#[from] ClinicError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RestApiError::Clinic(e) => {
                let status = match &e {
                    ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
                    ClinicError::InvalidTransition(_) => StatusCode::CONFLICT,
                    ClinicError::Unauthorized(_) | ClinicError::TokenExpired => {
                        StatusCode::UNAUTHORIZED
                    }
                    ClinicError::Upstream(_) => StatusCode::BAD_GATEWAY,
                    ClinicError::Storage(_) | ClinicError::Serde(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
            RestApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
    pub records: Arc<RecordsService>,
    pub llm: Arc<LlmClient>,
    pub prompts: Arc<PromptCache>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<SledStore>) -> Self {
        let queue: Arc<dyn QueueStore> = store.clone();
        let records: Arc<dyn RecordsStore> = store.clone();
        let prompts: Arc<dyn PromptStore> = store;
        AppState {
            bookings: Arc::new(BookingService::new(queue)),
            records: Arc::new(RecordsService::new(records)),
            llm: Arc::new(LlmClient::new(&settings)),
            prompts: Arc::new(PromptCache::new(prompts)),
            settings: Arc::new(settings),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/", get(handlers::admin::read_root))
        .route("/api/v1/health", get(handlers::admin::health_check))
        .route("/api/v1/version", get(handlers::admin::version))
        .route("/auth/login", post(handlers::admin::login))
        .route("/seed", post(handlers::admin::seed_database))
        .route("/queue", get(handlers::booking::read_queue))
        .route("/booking/create", post(handlers::booking::create_booking))
        .route("/booking/update", post(handlers::booking::update_booking))
        .route("/navigator/delay", post(handlers::navigator::simulate_delay))
        .route(
            "/navigator/status/:patient_id",
            get(handlers::navigator::patient_journey),
        )
        .route(
            "/navigator/analytics",
            get(handlers::navigator::clinic_analytics),
        )
        .route(
            "/navigator/care-path/:patient_id",
            get(handlers::navigator::care_path),
        )
        .route(
            "/records/list/:patient_id",
            get(handlers::records::list_records),
        )
        .route("/records/all-patients", get(handlers::records::all_patients))
        .route("/records/create", post(handlers::records::create_record))
        .route("/records/explain", post(handlers::records::explain_record))
        .route(
            "/records/health-summary",
            post(handlers::records::health_summary),
        )
        .route("/triage/assess", post(handlers::triage_chat::assess_patient))
        .with_state(state)
        .layer(cors)
}

/// Binds and serves the API until ctrl-c.
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.settings.host, state.settings.port);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Clinic API listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Clinic API stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal.");
    }
}
