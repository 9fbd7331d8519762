mod api_client;
mod cache;
mod config;
mod pages;
mod state;

use std::net::SocketAddr;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::ApiClient;
use crate::config::UiConfig;
use crate::state::UiState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = UiConfig::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume check UI v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend API at {}", config.api_url);

    let state = UiState::new(ApiClient::new(config.api_url.clone()), config.cache_ttl);
    let app = pages::router(state, config.max_upload_bytes).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
