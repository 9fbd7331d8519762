use axum::extract::{Multipart, Query, State};
use axum::response::Html;
use serde::Deserialize;

use super::{api_error_notice, escape_html, job_options, notice, read_form, render_page, score_color};
use super::{skills_list, NoticeKind, Page};
use crate::api_client::ResultView;
use crate::state::UiState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub job_id: Option<String>,
}

/// Job selector, JD preview and the resume form.
pub fn analyze_form(job_ids: &[String], selected: &str, jd_text: Option<&str>) -> String {
    let preview = match jd_text {
        Some(text) => format!("<pre class=\"jd\">{}</pre>", escape_html(text)),
        None => notice(NoticeKind::Warning, "Could not load job description preview."),
    };

    format!(
        "<form method=\"get\" action=\"/analyze\"><label for=\"preview_job\">Select the Job to Apply For</label>\
         <select id=\"preview_job\" name=\"job_id\">{options}</select>\
         <button type=\"submit\">Preview</button></form>\
         <details><summary>Click to Preview Selected Job Description</summary>{preview}</details>\
         <form method=\"post\" action=\"/analyze\" enctype=\"multipart/form-data\">\
         <input type=\"hidden\" name=\"job_id\" value=\"{job_id}\">\
         <label for=\"student_id\">Enter Student ID or Name</label>\
         <input type=\"text\" id=\"student_id\" name=\"student_id\">\
         <label for=\"file\">Upload Resume File</label>\
         <input type=\"file\" id=\"file\" name=\"file\" accept=\".pdf,.docx,.txt\">\
         <button type=\"submit\">Analyze Resume</button></form>",
        options = job_options(job_ids, Some(selected)),
        job_id = escape_html(selected),
    )
}

pub fn analysis_body(result: &ResultView) -> String {
    let mut html = notice(NoticeKind::Success, "Analysis Complete!");
    html.push_str(&format!(
        "<h2>Analysis for {} against Job ID {}</h2>\
         <p>Relevance Score</p><p class=\"metric\">{}/100</p>\
         <p><strong>Verdict:</strong> <span style=\"color:{}; font-weight:bold\">{}</span></p>",
        escape_html(&result.student_id),
        escape_html(&result.job_id),
        result.score,
        score_color(result.score),
        escape_html(&result.verdict),
    ));

    let feedback = if result.feedback.is_empty() {
        "No feedback."
    } else {
        result.feedback.as_str()
    };
    html.push_str(&notice(NoticeKind::Info, &format!("AI Feedback:\n\n{feedback}")));

    if let Some(list) = skills_list(&result.missing_skills) {
        html.push_str(&notice(NoticeKind::Warning, "Areas for Improvement (Missing Skills):"));
        html.push_str(&list);
    }
    html
}

async fn render_analyze(state: &UiState, selected: Option<&str>, outcome: &str) -> Html<String> {
    let mut body = String::from("<h2>Upload and Analyze a Resume</h2>");

    match state.job_ids().await {
        Ok(job_ids) if job_ids.is_empty() => body.push_str(&notice(
            NoticeKind::Warning,
            "No jobs found. Please go to 'Manage Job Descriptions' to add a job.",
        )),
        Ok(job_ids) => {
            let selected = selected
                .filter(|id| job_ids.iter().any(|j| j == id))
                .unwrap_or(&job_ids[0]);
            let jd_text = state.jd_text(selected).await.ok().flatten();
            body.push_str(&analyze_form(&job_ids, selected, jd_text.as_deref()));
        }
        Err(e) => body.push_str(&api_error_notice(&e)),
    }

    body.push_str(outcome);
    render_page(Page::Analyze, &body)
}

/// GET /analyze
pub async fn analyze_page(State(state): State<UiState>, Query(query): Query<AnalyzeQuery>) -> Html<String> {
    render_analyze(&state, query.job_id.as_deref(), "").await
}

/// POST /analyze
pub async fn submit_resume(State(state): State<UiState>, multipart: Multipart) -> Html<String> {
    let mut form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => return render_analyze(&state, None, &notice(NoticeKind::Error, &message)).await,
    };

    let student_id = form.field("student_id").map(str::to_string);
    let job_id = form.field("job_id").map(str::to_string);
    let (Some(student_id), Some(job_id), Some(file)) = (student_id, job_id.clone(), form.file.take())
    else {
        let warning = notice(NoticeKind::Warning, "Please fill in all fields and upload a resume.");
        return render_analyze(&state, job_id.as_deref(), &warning).await;
    };

    let outcome = match state.api.upload_resume(&student_id, &job_id, file).await {
        Ok(result) => analysis_body(&result),
        Err(e) => api_error_notice(&e),
    };
    render_analyze(&state, Some(&job_id), &outcome).await
}
