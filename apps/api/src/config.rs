use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::LlmProvider;

/// Application configuration loaded from environment variables.
///
/// The LLM credential is not part of this struct. `LlmClient` reads it from the
/// environment on every call.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub llm: LlmConfig,
    /// Replacement skills vocabulary; `None` keeps the built-in list.
    pub skills_vocabulary: Option<Vec<String>>,
    /// File holding a replacement semantic prompt template.
    pub semantic_prompt_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider = match optional_env("LLM_PROVIDER") {
            Some(raw) => raw.parse::<LlmProvider>()?,
            None => LlmProvider::default(),
        };

        let timeout = optional_env("LLM_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?
            .map(Duration::from_secs);

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://resume_analyzer.db".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8090".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (20 * 1024 * 1024).to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            llm: LlmConfig {
                provider,
                model: optional_env("LLM_MODEL"),
                base_url: optional_env("LLM_BASE_URL"),
                timeout,
            },
            skills_vocabulary: optional_env("SKILLS_VOCABULARY").map(|raw| parse_vocabulary(&raw)),
            semantic_prompt_path: optional_env("SEMANTIC_PROMPT_PATH"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated vocabulary, lowercasing and dropping blanks.
pub fn parse_vocabulary(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vocabulary_trims_and_lowercases() {
        assert_eq!(
            parse_vocabulary(" Rust, GO ,,sql "),
            vec!["rust".to_string(), "go".to_string(), "sql".to_string()]
        );
    }

    #[test]
    fn test_parse_vocabulary_empty_input() {
        assert!(parse_vocabulary(" , ").is_empty());
    }
}
