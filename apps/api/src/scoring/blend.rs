/// Weight of the hard-match score, in percent.
pub const HARD_MATCH_WEIGHT_PCT: u32 = 40;
/// Weight of the semantic score, in percent.
pub const SEMANTIC_WEIGHT_PCT: u32 = 60;

/// `floor(0.4 * hard + 0.6 * semantic)`, computed in integers.
/// Inputs above 100 are capped so the result stays within 0–100.
pub fn blend_scores(hard_match: u32, semantic: u32) -> u32 {
    let hard_match = hard_match.min(100);
    let semantic = semantic.min(100);
    (HARD_MATCH_WEIGHT_PCT * hard_match + SEMANTIC_WEIGHT_PCT * semantic) / 100
}
