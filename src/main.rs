mod calendar;
mod config;
mod errors;
mod export;
mod models;
mod server;
mod state;

use crate::calendar::client::CalendarClient;
use crate::state::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("econ_desk starting");

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let calendar_client = CalendarClient::new(
        &cfg.calendar_api_base_url,
        cfg.calendar_api_key.clone(),
        cfg.provider_timeout_secs,
    );
    tracing::info!(
        provider = %cfg.calendar_api_base_url,
        authenticated = cfg.calendar_api_key.is_some(),
        timezone = %cfg.default_timezone,
        "calendar provider configured"
    );

    let port = cfg.server_port;
    let app_state = AppState::new(cfg, Arc::new(calendar_client));
    let app = server::build_router(app_state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
