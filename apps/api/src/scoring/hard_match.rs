//! Keyword overlap between a job and a resume, measured against a skills vocabulary.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Built-in vocabulary. Multi-token terms such as `machine learning` or `c++`
/// never appear in a `\b\w+\b` word set, so they never count as relevant.
pub const DEFAULT_SKILLS_VOCABULARY: [&str; 20] = [
    "python",
    "java",
    "c++",
    "sql",
    "javascript",
    "react",
    "angular",
    "vue",
    "machine learning",
    "data science",
    "artificial intelligence",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "api",
    "git",
    "agile",
    "scrum",
];

/// Returned when the JD names none of the vocabulary terms.
pub const NEUTRAL_SCORE: u32 = 50;

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").expect("word pattern is a valid regex"));

/// Set of `\b\w+\b` tokens in `text`.
pub fn word_set(text: &str) -> HashSet<&str> {
    WORD_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardMatchReport {
    pub score: u32,
    /// Vocabulary terms present in the JD, in vocabulary order.
    pub relevant: Vec<String>,
    /// Relevant terms also present in the resume.
    pub matched: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    vocabulary: Vec<String>,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS_VOCABULARY.iter().map(|s| s.to_string()).collect())
    }
}

impl KeywordMatcher {
    pub fn new(vocabulary: Vec<String>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Both texts are expected to be lowercase already.
    pub fn evaluate(&self, jd_text: &str, resume_text: &str) -> HardMatchReport {
        let jd_words = word_set(jd_text);
        let resume_words = word_set(resume_text);

        let relevant: Vec<String> = self
            .vocabulary
            .iter()
            .filter(|term| jd_words.contains(term.as_str()))
            .cloned()
            .collect();

        if relevant.is_empty() {
            return HardMatchReport {
                score: NEUTRAL_SCORE,
                relevant,
                matched: vec![],
            };
        }

        let matched: Vec<String> = relevant
            .iter()
            .filter(|term| resume_words.contains(term.as_str()))
            .cloned()
            .collect();

        let score = (100 * matched.len() / relevant.len()) as u32;

        HardMatchReport {
            score,
            relevant,
            matched,
        }
    }

    pub fn score(&self, jd_text: &str, resume_text: &str) -> u32 {
        self.evaluate(jd_text, resume_text).score
    }
}
