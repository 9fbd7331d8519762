// LLM prompt constants for semantic resume analysis.
// Reuses the JSON-only fragment from llm_client::prompts.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as SEMANTIC_SYSTEM;

/// Semantic analysis prompt. `{jd_text}` and `{resume_text}` are filled by
/// `render_prompt`.
pub const SEMANTIC_PROMPT_TEMPLATE: &str = r#"As an expert technical recruiter, analyze the provided job description (JD) and resume.
Provide your analysis in a structured JSON format.

Job Description:
---
{jd_text}
---
Resume:
---
{resume_text}
---

Based on the comparison, provide the following in a JSON object:
1. "semantic_score": An integer relevance score from 0 to 100 based on contextual and semantic fit.
2. "verdict": A verdict of "High", "Medium", or "Low".
3. "missing_skills": A list of key skills, tools, or experiences mentioned in the JD that are missing from the resume.
4. "feedback": A paragraph of constructive feedback for the candidate on how to improve their resume for this specific job.

Your response MUST be a valid JSON object only."#;

const JD_PLACEHOLDER: &str = "{jd_text}";
const RESUME_PLACEHOLDER: &str = "{resume_text}";

/// Fills both placeholders in one left-to-right pass, so placeholder-looking
/// text inside the documents is never substituted.
pub fn render_prompt(template: &str, jd_text: &str, resume_text: &str) -> String {
    let mut out = String::with_capacity(template.len() + jd_text.len() + resume_text.len());
    let mut rest = template;

    loop {
        let next = [
            (rest.find(JD_PLACEHOLDER), JD_PLACEHOLDER, jd_text),
            (rest.find(RESUME_PLACEHOLDER), RESUME_PLACEHOLDER, resume_text),
        ]
        .into_iter()
        .filter_map(|(pos, placeholder, value)| pos.map(|p| (p, placeholder, value)))
        .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, placeholder, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + placeholder.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
