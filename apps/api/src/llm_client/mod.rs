//! Client for the configured language-model provider. Every model call goes through here.
//!
//! No other module may call a provider API directly.
//!
//! The API key is read from the process environment on every call, never at
//! startup. One request per call: there is no retry loop.

use std::fmt;
use std::str::FromStr;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::LlmConfig;

pub mod prompts;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0} environment variable not set")]
    MissingCredential(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM response failed validation: {0}")]
    Invalid(String),

    #[error("unknown LLM provider '{0}' (expected 'gemini' or 'anthropic')")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LlmProvider {
    #[default]
    Gemini,
    Anthropic,
}

impl LlmProvider {
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-1.5-flash",
            LlmProvider::Anthropic => "claude-sonnet-4-5",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com",
            LlmProvider::Anthropic => "https://api.anthropic.com",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Gemini => f.write_str("gemini"),
            LlmProvider::Anthropic => f.write_str("anthropic"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "anthropic" => Ok(LlmProvider::Anthropic),
            other => Err(LlmError::UnknownProvider(other.to_string())),
        }
    }
}

// ── Anthropic Messages API ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

// ── Gemini generateContent API ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

/// Both providers report failures as `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client used by the semantic analyzer.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: LlmProvider,
    model: String,
    base_url: String,
    api_key_env: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            provider: config.provider,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| config.provider.default_model().to_string()),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| config.provider.default_base_url().to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key_env: config.provider.api_key_env().to_string(),
        })
    }

    /// Reads the credential from `var` instead of the provider's default variable.
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Result<String, LlmError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredential(self.api_key_env.clone()))
    }

    /// Sends one prompt and returns the text of the first text part of the reply.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let api_key = self.api_key()?;

        let response = match self.provider {
            LlmProvider::Anthropic => {
                let body = AnthropicRequest {
                    model: &self.model,
                    max_tokens: MAX_TOKENS,
                    system,
                    messages: vec![AnthropicMessage {
                        role: "user",
                        content: prompt,
                    }],
                };
                self.client
                    .post(format!("{}/v1/messages", self.base_url))
                    .header("x-api-key", &api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
                    .send()
                    .await?
            }
            LlmProvider::Gemini => {
                let body = GeminiRequest {
                    system_instruction: GeminiContent {
                        role: None,
                        parts: vec![GeminiPart { text: system }],
                    },
                    contents: vec![GeminiContent {
                        role: Some("user"),
                        parts: vec![GeminiPart { text: prompt }],
                    }],
                };
                self.client
                    .post(format!(
                        "{}/v1beta/models/{}:generateContent",
                        self.base_url, self.model
                    ))
                    .header("x-goog-api-key", &api_key)
                    .json(&body)
                    .send()
                    .await?
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = match self.provider {
            LlmProvider::Anthropic => {
                let parsed: AnthropicResponse = response.json().await?;
                if let Some(usage) = &parsed.usage {
                    debug!(
                        "LLM call succeeded: input_tokens={}, output_tokens={}",
                        usage.input_tokens, usage.output_tokens
                    );
                }
                parsed
                    .content
                    .into_iter()
                    .find(|b| b.block_type == "text")
                    .and_then(|b| b.text)
            }
            LlmProvider::Gemini => {
                let parsed: GeminiResponse = response.json().await?;
                parsed
                    .candidates
                    .into_iter()
                    .filter_map(|c| c.content)
                    .flat_map(|c| c.parts)
                    .find_map(|p| p.text)
            }
        };

        text.filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    /// Calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.call(prompt, system).await?;
        serde_json::from_str(strip_json_fences(&text)).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
