// Scoring pipeline: hard match + semantic analysis, blended into one score.

pub mod blend;
pub mod handlers;
pub mod hard_match;
pub mod prompts;
pub mod semantic;

use tracing::{debug, info};

use crate::scoring::blend::blend_scores;
use crate::scoring::hard_match::{HardMatchReport, KeywordMatcher};
use crate::scoring::semantic::{SemanticAnalysis, SemanticAnalyzer};

#[derive(Debug, Clone)]
pub struct Scorecard {
    pub hard_match: HardMatchReport,
    pub semantic: SemanticAnalysis,
    pub final_score: u32,
}

/// Runs both scorers over the texts and blends the results.
pub async fn score_submission(
    matcher: &KeywordMatcher,
    analyzer: &dyn SemanticAnalyzer,
    jd_text: &str,
    resume_text: &str,
) -> Scorecard {
    let hard_match = matcher.evaluate(jd_text, resume_text);
    debug!(
        "Hard match: relevant={:?} matched={:?}",
        hard_match.relevant, hard_match.matched
    );

    let semantic = analyzer.analyze(jd_text, resume_text).await;
    let final_score = blend_scores(hard_match.score, semantic.semantic_score);

    info!(
        "Scored submission: hard_match={} semantic={} final={}",
        hard_match.score, semantic.semantic_score, final_score
    );

    Scorecard {
        hard_match,
        semantic,
        final_score,
    }
}
