use std::time::Duration;

use anyhow::{Context, Result};

/// UI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub api_url: String,
    pub port: u16,
    pub cache_ttl: Duration,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl UiConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(UiConfig {
            api_url: std::env::var("API_URL")
                .unwrap_or_else(|_| "http://localhost:8090".to_string())
                .trim_end_matches('/')
                .to_string(),
            port: std::env::var("UI_PORT")
                .unwrap_or_else(|_| "8501".to_string())
                .parse::<u16>()
                .context("UI_PORT must be a valid port number")?,
            cache_ttl: Duration::from_secs(
                std::env::var("UI_CACHE_TTL_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse::<u64>()
                    .context("UI_CACHE_TTL_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (20 * 1024 * 1024).to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a number of bytes")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
