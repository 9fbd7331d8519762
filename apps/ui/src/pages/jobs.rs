//! Manage Job Descriptions: create, edit and delete JDs.

use axum::extract::{Form, Multipart, Path, Query, State};
use axum::response::Html;
use serde::Deserialize;
use tracing::info;

use super::{api_error_notice, escape_html, job_options, notice, read_form, render_page};
use super::{NoticeKind, Page};
use crate::state::UiState;

#[derive(Debug, Deserialize)]
pub struct ManageQuery {
    pub job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub jd_text: String,
}

const CREATE_FORM: &str = r#"<h2>Upload a New Job Description</h2>
<form method="post" action="/jobs" enctype="multipart/form-data">
  <label for="job_id">Enter a Unique Job ID</label>
  <input type="text" id="job_id" name="job_id" placeholder="e.g., 'SWE-001'">
  <label for="file">Upload JD File</label>
  <input type="file" id="file" name="file" accept=".pdf,.docx,.txt">
  <button type="submit">Upload JD</button>
</form>"#;

/// Selector over existing jobs plus, for the selected one, the edit form.
pub fn existing_section(job_ids: &[String], selected: Option<&str>, jd_text: Option<&str>) -> String {
    let mut html = String::from("<h2>Manage Existing Job Descriptions</h2>");

    if job_ids.is_empty() {
        html.push_str(&notice(
            NoticeKind::Info,
            "No job descriptions have been uploaded yet. Use the form above to add one.",
        ));
        return html;
    }

    html.push_str(&format!(
        "<form method=\"get\" action=\"/\"><label for=\"select_job\">Select a Job ID to manage</label>\
         <select id=\"select_job\" name=\"job_id\"><option value=\"\"></option>{}</select>\
         <button type=\"submit\">Open</button></form>",
        job_options(job_ids, selected)
    ));

    let Some(job_id) = selected else {
        return html;
    };
    let Some(jd_text) = jd_text else {
        html.push_str(&notice(
            NoticeKind::Warning,
            &format!("Job ID '{job_id}' could not be loaded."),
        ));
        return html;
    };

    let path = urlencoding::encode(job_id);
    let shown = escape_html(job_id);
    html.push_str(&format!(
        "<form method=\"post\" action=\"/jobs/{path}/update\">\
         <p><strong>Editing Job ID:</strong> <code>{shown}</code></p>\
         <label for=\"jd_text\">Job Description Text</label>\
         <textarea id=\"jd_text\" name=\"jd_text\">{}</textarea>\
         <button type=\"submit\">Update Job Description</button></form>\
         <hr><h3>Danger Zone</h3>\
         <a href=\"/jobs/{path}/delete\">Delete Job ID: {shown}</a>",
        escape_html(jd_text)
    ));
    html
}

pub fn confirm_delete_body(job_id: &str) -> String {
    let path = urlencoding::encode(job_id);
    format!(
        "<h2>Delete Job Description</h2>{}\
         <form method=\"post\" action=\"/jobs/{path}/delete\">\
         <button type=\"submit\" class=\"danger\">Yes, I am sure, DELETE</button></form>\
         <a href=\"/?job_id={path}\">Cancel</a>",
        notice(
            NoticeKind::Warning,
            &format!(
                "Are you absolutely sure you want to delete '{job_id}'? This will also delete \
                 all associated application results and cannot be undone."
            ),
        )
    )
}

async fn render_manage(state: &UiState, selected: Option<&str>, notices: &str) -> Html<String> {
    let mut body = format!("<h2 class=\"page\">Manage Job Descriptions (JDs)</h2>{notices}{CREATE_FORM}");

    match state.job_ids().await {
        Ok(job_ids) => {
            let selected = selected.filter(|id| job_ids.iter().any(|j| j == id));
            let jd_text = match selected {
                Some(id) => match state.jd_text(id).await {
                    Ok(text) => text,
                    Err(e) => {
                        body.push_str(&api_error_notice(&e));
                        None
                    }
                },
                None => None,
            };
            body.push_str(&existing_section(&job_ids, selected, jd_text.as_deref()));
        }
        Err(e) => body.push_str(&api_error_notice(&e)),
    }

    render_page(Page::ManageJobs, &body)
}

/// GET /
pub async fn manage_page(State(state): State<UiState>, Query(query): Query<ManageQuery>) -> Html<String> {
    let selected = query.job_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
    render_manage(&state, selected, "").await
}

/// POST /jobs
pub async fn create_job(State(state): State<UiState>, multipart: Multipart) -> Html<String> {
    let mut form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => return render_manage(&state, None, &notice(NoticeKind::Error, &message)).await,
    };

    let job_id = form.field("job_id").map(str::to_string);
    let (Some(job_id), Some(file)) = (job_id, form.file.take()) else {
        let warning = notice(NoticeKind::Warning, "Please provide a Job ID and upload a file.");
        return render_manage(&state, None, &warning).await;
    };

    let outcome = match state.api.upload_jd(&job_id, file).await {
        Ok(message) => {
            info!("Uploaded JD for {job_id}");
            state.invalidate();
            notice(NoticeKind::Success, &message)
        }
        Err(e) => api_error_notice(&e),
    };
    render_manage(&state, None, &outcome).await
}

/// POST /jobs/:job_id/update
pub async fn update_job(
    State(state): State<UiState>,
    Path(job_id): Path<String>,
    Form(form): Form<UpdateForm>,
) -> Html<String> {
    let outcome = match state.api.update_job(&job_id, &form.jd_text).await {
        Ok(message) => {
            state.invalidate();
            notice(NoticeKind::Success, &message)
        }
        Err(e) => api_error_notice(&e),
    };
    render_manage(&state, Some(&job_id), &outcome).await
}

/// GET /jobs/:job_id/delete
pub async fn confirm_delete(Path(job_id): Path<String>) -> Html<String> {
    render_page(Page::ManageJobs, &confirm_delete_body(&job_id))
}

/// POST /jobs/:job_id/delete
pub async fn delete_job(State(state): State<UiState>, Path(job_id): Path<String>) -> Html<String> {
    let outcome = match state.api.delete_job(&job_id).await {
        Ok(message) => {
            info!("Deleted job {job_id}");
            state.invalidate();
            notice(NoticeKind::Success, &message)
        }
        Err(e) => api_error_notice(&e),
    };
    render_manage(&state, None, &outcome).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_section_without_jobs() {
        let html = existing_section(&[], None, None);
        assert!(html.contains("No job descriptions have been uploaded yet."));
        assert!(!html.contains("<select"));
    }

    #[test]
    fn test_existing_section_with_selection_shows_editor() {
        let ids = vec!["swe 1".to_string()];
        let html = existing_section(&ids, Some("swe 1"), Some("needs <rust>"));
        assert!(html.contains("action=\"/jobs/swe%201/update\""));
        assert!(html.contains("<textarea id=\"jd_text\" name=\"jd_text\">needs &lt;rust&gt;</textarea>"));
        assert!(html.contains("href=\"/jobs/swe%201/delete\""));
    }

    #[test]
    fn test_existing_section_unloadable_job() {
        let ids = vec!["a".to_string()];
        let html = existing_section(&ids, Some("a"), None);
        assert!(html.contains("Job ID &#39;a&#39; could not be loaded."));
        assert!(!html.contains("<textarea"));
    }

    #[test]
    fn test_links_encode_reserved_characters() {
        let html = confirm_delete_body("ml/ai?x");
        assert!(html.contains("action=\"/jobs/ml%2Fai%3Fx/delete\""));
        assert!(html.contains("href=\"/?job_id=ml%2Fai%3Fx\""));
    }

    #[test]
    fn test_confirm_delete_body() {
        let html = confirm_delete_body("SWE-001");
        assert!(html.contains("delete &#39;SWE-001&#39;?"));
        assert!(html.contains("action=\"/jobs/SWE-001/delete\""));
        assert!(html.contains("href=\"/?job_id=SWE-001\""));
    }
}
