//! Server-rendered pages. Each page builds its body as an HTML fragment and
//! wraps it in the shared layout.

pub mod analyze;
pub mod jobs;
pub mod results;

use std::collections::HashMap;

use axum::extract::{DefaultBodyLimit, Multipart};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;

use crate::api_client::{ApiClientError, FileUpload};
use crate::state::UiState;

const LAYOUT_HTML: &str = include_str!("../../templates/layout.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    ManageJobs,
    Analyze,
    Results,
}

impl Page {
    const ALL: [Page; 3] = [Page::ManageJobs, Page::Analyze, Page::Results];

    fn label(self) -> &'static str {
        match self {
            Page::ManageJobs => "Manage Job Descriptions",
            Page::Analyze => "Analyze Resume",
            Page::Results => "View All Results",
        }
    }

    fn href(self) -> &'static str {
        match self {
            Page::ManageJobs => "/",
            Page::Analyze => "/analyze",
            Page::Results => "/results",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    fn class(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Warning => "warning",
            NoticeKind::Info => "info",
        }
    }
}

pub fn router(state: UiState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(jobs::manage_page))
        .route("/jobs", post(jobs::create_job))
        .route("/jobs/:job_id/update", post(jobs::update_job))
        .route("/jobs/:job_id/delete", get(jobs::confirm_delete).post(jobs::delete_job))
        .route("/analyze", get(analyze::analyze_page).post(analyze::submit_resume))
        .route("/results", get(results::results_page))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Wraps a body fragment in the layout with `active` highlighted.
pub fn render_page(active: Page, body: &str) -> Html<String> {
    let nav: String = Page::ALL
        .iter()
        .map(|page| {
            let class = if *page == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{class}>{}</a>", page.href(), page.label())
        })
        .collect();

    // content last: it carries user text
    let html = LAYOUT_HTML
        .replace("{{ title }}", active.label())
        .replace("{{ nav }}", &nav)
        .replace("{{ content }}", body);
    Html(html)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Notice box. `message` is escaped here.
pub fn notice(kind: NoticeKind, message: &str) -> String {
    format!(
        "<div class=\"notice {}\">{}</div>",
        kind.class(),
        escape_html(message)
    )
}

/// Error notice for a failed backend call.
pub fn api_error_notice(err: &ApiClientError) -> String {
    match err {
        ApiClientError::Connection(_) => notice(NoticeKind::Error, &err.to_string()),
        _ => notice(NoticeKind::Error, &format!("Error: {err}")),
    }
}

pub fn score_color(score: u32) -> &'static str {
    if score >= 75 {
        "green"
    } else if score >= 50 {
        "orange"
    } else {
        "red"
    }
}

/// `<option>` list for a job selector, `selected` pre-chosen.
pub fn job_options(job_ids: &[String], selected: Option<&str>) -> String {
    job_ids
        .iter()
        .map(|id| {
            let marker = if Some(id.as_str()) == selected { " selected" } else { "" };
            let id = escape_html(id);
            format!("<option value=\"{id}\"{marker}>{id}</option>")
        })
        .collect()
}

/// `<ul>` of missing skills, or `None` when the list is empty.
pub fn skills_list(skills: &[String]) -> Option<String> {
    if skills.is_empty() {
        return None;
    }
    let items: String = skills
        .iter()
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();
    Some(format!("<ul>{items}</ul>"))
}

/// Text fields and the optional `file` part of a submitted form.
#[derive(Debug, Default)]
pub struct SubmittedForm {
    fields: HashMap<String, String>,
    pub file: Option<FileUpload>,
}

impl SubmittedForm {
    /// Trimmed value of a text field, `None` when absent or blank.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Reads a browser multipart form. A file input left empty yields no file.
pub async fn read_form(mut multipart: Multipart) -> Result<SubmittedForm, String> {
    let mut form = SubmittedForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid form submission: {e}"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data: Bytes = field
                .bytes()
                .await
                .map_err(|e| format!("Failed to read uploaded file: {e}"))?;
            if !filename.is_empty() || !data.is_empty() {
                form.file = Some(FileUpload { filename, data });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Invalid form field '{name}': {e}"))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
