//! Shift Scheduling - Axum Server
//!
//! Run with: cargo run
//! Then open: http://localhost:7860/health

use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use shift_scheduling::api::{self, AppState};
use shift_scheduling::config::AppConfig;
use shift_scheduling::console;
use shift_scheduling::store::ScheduleStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("shift_scheduling=info".parse()?),
        )
        .init();

    console::print_banner();

    let config = AppConfig::from_env()?;
    let store = match &config.store_path {
        Some(path) => ScheduleStore::open(path, config.work_rules),
        None => ScheduleStore::in_memory(config.work_rules),
    };
    console::print_config(&config, store.len());

    let addr = config.socket_addr()?;
    let state = Arc::new(AppState::new(config, store));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    console::print_listening(&addr.to_string());
    axum::serve(listener, app).await?;
    Ok(())
}
