use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use super::{api_error_notice, escape_html, notice, render_page, skills_list, NoticeKind, Page};
use crate::api_client::ResultView;
use crate::state::UiState;

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub job_id: Option<String>,
    /// Set by the "Fetch Results" button.
    pub fetch: Option<String>,
}

fn filter_form(job_id: &str) -> String {
    format!(
        "<form method=\"get\" action=\"/results\">\
         <label for=\"job_filter\">Filter by Job ID (Optional)</label>\
         <input type=\"text\" id=\"job_filter\" name=\"job_id\" value=\"{}\">\
         <button type=\"submit\" name=\"fetch\" value=\"1\">Fetch Results</button></form>",
        escape_html(job_id)
    )
}

pub fn results_list(results: &[ResultView]) -> String {
    if results.is_empty() {
        return notice(NoticeKind::Info, "No results found for the given criteria.");
    }

    let mut html = notice(NoticeKind::Success, &format!("Found {} results.", results.len()));
    for result in results {
        let skills = match skills_list(&result.missing_skills) {
            Some(list) => format!("<p><strong>Missing Skills:</strong></p>{list}"),
            None => "<p><strong>Missing Skills:</strong> None identified.</p>".to_string(),
        };
        html.push_str(&format!(
            "<details class=\"result\" id=\"result-{id}\"><summary><strong>{student}</strong> applied for \
             <strong>{job}</strong> | Score: {score}</summary>\
             <p><strong>Verdict:</strong> {verdict}</p>\
             <p><strong>Feedback:</strong> {feedback}</p>{skills}\
             <p><small>Analyzed on: {timestamp}</small></p></details>",
            id = result.id,
            student = escape_html(&result.student_id),
            job = escape_html(&result.job_id),
            score = result.score,
            verdict = escape_html(&result.verdict),
            feedback = escape_html(&result.feedback),
            timestamp = result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        ));
    }
    html
}

/// GET /results
pub async fn results_page(State(state): State<UiState>, Query(query): Query<ResultsQuery>) -> Html<String> {
    let job_id = query.job_id.as_deref().map(str::trim).unwrap_or_default();
    let mut body = format!("<h2>View All Submission Results</h2>{}", filter_form(job_id));

    if query.fetch.is_some() {
        let filter = Some(job_id).filter(|id| !id.is_empty());
        match state.api.list_results(filter).await {
            Ok(results) => body.push_str(&results_list(&results)),
            Err(e) => body.push_str(&api_error_notice(&e)),
        }
    }

    render_page(Page::Results, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn result(id: i64, missing: Vec<String>) -> ResultView {
        ResultView {
            id,
            student_id: format!("student-{id}"),
            job_id: "swe-1".to_string(),
            score: 42,
            verdict: "Low".to_string(),
            missing_skills: missing,
            feedback: "Needs work.".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_results_list_empty() {
        assert!(results_list(&[]).contains("No results found for the given criteria."));
    }

    #[test]
    fn test_results_list_renders_each_result() {
        let html = results_list(&[result(1, vec![]), result(2, vec!["docker".to_string()])]);
        assert!(html.contains("Found 2 results."));
        assert!(html.contains("id=\"result-2\""));
        assert!(html.contains("<strong>student-1</strong> applied for <strong>swe-1</strong> | Score: 42"));
        assert!(html.contains("<strong>Missing Skills:</strong> None identified."));
        assert!(html.contains("<ul><li>docker</li></ul>"));
        assert!(html.contains("Analyzed on: 2024-05-01 10:30:00 UTC"));
    }

    #[test]
    fn test_filter_form_keeps_value() {
        assert!(filter_form("a\"b").contains("value=\"a&quot;b\""));
    }
}
