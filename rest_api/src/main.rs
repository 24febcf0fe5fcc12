// rest_api/src/main.rs

use std::sync::Arc;

use rest_api::config::load_settings;
use rest_api::{AppState, start_server};
use storage::SledStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    info!("Opening clinic store at {}", settings.data_dir);
    let store = Arc::new(SledStore::open(&settings.data_dir)?);

    let state = AppState::new(settings, store);
    start_server(state).await
}
