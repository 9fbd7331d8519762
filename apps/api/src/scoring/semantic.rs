//! Language-model judgement of resume fit, with a sentinel result on any failure.
//!
//! `AppState` holds an `Arc<dyn SemanticAnalyzer>`; handlers never see an LLM
//! error, only a `SemanticAnalysis` whose verdict may be `Error`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::llm_client::{LlmClient, LlmError};
use crate::models::result::Verdict;
use crate::scoring::prompts::{render_prompt, SEMANTIC_SYSTEM};

pub const FALLBACK_FEEDBACK: &str = "Could not analyze the resume due to an API or parsing error.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticAnalysis {
    pub semantic_score: u32,
    pub verdict: Verdict,
    pub missing_skills: Vec<String>,
    pub feedback: String,
}

impl SemanticAnalysis {
    /// The record substituted for any failed analysis.
    pub fn fallback() -> Self {
        Self {
            semantic_score: 0,
            verdict: Verdict::Error,
            missing_skills: vec![],
            feedback: FALLBACK_FEEDBACK.to_string(),
        }
    }
}

/// Wire shape of the model's reply, before validation.
#[derive(Debug, Deserialize)]
pub struct RawAnalysis {
    pub semantic_score: f64,
    pub verdict: String,
    pub missing_skills: Vec<String>,
    pub feedback: String,
}

impl TryFrom<RawAnalysis> for SemanticAnalysis {
    type Error = LlmError;

    fn try_from(raw: RawAnalysis) -> Result<Self, Self::Error> {
        if !raw.semantic_score.is_finite() || !(0.0..=100.0).contains(&raw.semantic_score) {
            return Err(LlmError::Invalid(format!(
                "semantic_score {} is outside 0-100",
                raw.semantic_score
            )));
        }

        let verdict = raw
            .verdict
            .parse::<Verdict>()
            .ok()
            .filter(|v| *v != Verdict::Error)
            .ok_or_else(|| LlmError::Invalid(format!("unexpected verdict '{}'", raw.verdict)))?;

        Ok(Self {
            semantic_score: raw.semantic_score.trunc() as u32,
            verdict,
            missing_skills: raw
                .missing_skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            feedback: raw.feedback.trim().to_string(),
        })
    }
}

#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    /// Never fails: errors are logged and replaced by `SemanticAnalysis::fallback()`.
    async fn analyze(&self, jd_text: &str, resume_text: &str) -> SemanticAnalysis;
}

/// Semantic analyzer backed by the configured LLM provider.
pub struct LlmSemanticAnalyzer {
    llm: LlmClient,
    prompt_template: String,
}

impl LlmSemanticAnalyzer {
    pub fn new(llm: LlmClient, prompt_template: impl Into<String>) -> Self {
        Self {
            llm,
            prompt_template: prompt_template.into(),
        }
    }

    pub async fn try_analyze(
        &self,
        jd_text: &str,
        resume_text: &str,
    ) -> Result<SemanticAnalysis, LlmError> {
        let prompt = render_prompt(&self.prompt_template, jd_text, resume_text);
        let raw: RawAnalysis = self.llm.call_json(&prompt, SEMANTIC_SYSTEM).await?;
        SemanticAnalysis::try_from(raw)
    }
}

#[async_trait]
impl SemanticAnalyzer for LlmSemanticAnalyzer {
    async fn analyze(&self, jd_text: &str, resume_text: &str) -> SemanticAnalysis {
        match self.try_analyze(jd_text, resume_text).await {
            Ok(analysis) => {
                info!(
                    "Semantic analysis via {} ({}): score={} verdict={}",
                    self.llm.provider(),
                    self.llm.model(),
                    analysis.semantic_score,
                    analysis.verdict
                );
                analysis
            }
            Err(e) => {
                error!("An error occurred in semantic analysis: {e}");
                SemanticAnalysis::fallback()
            }
        }
    }
}
