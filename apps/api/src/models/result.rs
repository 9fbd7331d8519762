use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use thiserror::Error;

/// Categorical fit label. `Error` marks a result whose semantic analysis failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    High,
    Medium,
    Low,
    Error,
}

#[derive(Debug, Error)]
#[error("unknown verdict '{0}'")]
pub struct UnknownVerdict(pub String);

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::High => "High",
            Verdict::Medium => "Medium",
            Verdict::Low => "Low",
            Verdict::Error => "Error",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for Verdict {
    type Err = UnknownVerdict;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Verdict::High),
            "medium" => Ok(Verdict::Medium),
            "low" => Ok(Verdict::Low),
            "error" => Ok(Verdict::Error),
            _ => Err(UnknownVerdict(s.to_string())),
        }
    }
}

/// A scored submission ready to be appended to the results log.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub student_id: String,
    pub job_id: String,
    pub score: u32,
    pub verdict: Verdict,
    pub missing_skills: Vec<String>,
    pub feedback: String,
}

/// Raw `results` row. `missing_skills` is stored as a JSON array in TEXT.
#[derive(Debug, Clone, FromRow)]
pub struct ResultRow {
    pub id: i64,
    pub student_id: String,
    pub job_id: String,
    pub score: i64,
    pub verdict: String,
    pub missing_skills: Json<Vec<String>>,
    pub feedback: String,
    pub timestamp: DateTime<Utc>,
}

/// A persisted result as returned over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: i64,
    pub student_id: String,
    pub job_id: String,
    pub score: u32,
    pub verdict: Verdict,
    pub missing_skills: Vec<String>,
    pub feedback: String,
    pub timestamp: DateTime<Utc>,
}

impl TryFrom<ResultRow> for ResultRecord {
    type Error = UnknownVerdict;

    fn try_from(row: ResultRow) -> Result<Self, Self::Error> {
        Ok(ResultRecord {
            id: row.id,
            student_id: row.student_id,
            job_id: row.job_id,
            score: row.score.clamp(0, 100) as u32,
            verdict: row.verdict.parse()?,
            missing_skills: row.missing_skills.0,
            feedback: row.feedback,
            timestamp: row.timestamp,
        })
    }
}
