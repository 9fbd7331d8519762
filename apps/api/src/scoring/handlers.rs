//! Axum route handlers for resume submission and the results log.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::extraction::upload::parse_multipart;
use crate::models::result::{NewResult, ResultRecord};
use crate::scoring::score_submission;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub job_id: Option<String>,
}

/// POST /api/v1/upload_resume
///
/// Multipart `student_id` + `job_id` + `file`. Extracts, scores, persists and
/// returns the stored result. A failed semantic analysis still yields 200,
/// with verdict `Error`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResultRecord>, AppError> {
    let mut form = parse_multipart(multipart).await?;
    let student_id = form.field("student_id").map(str::to_string);
    let job_id = form.field("job_id").map(str::to_string);
    let (Some(student_id), Some(job_id), Some(file)) = (student_id, job_id, form.file.take())
    else {
        return Err(AppError::Validation(
            "Missing student_id, job_id, or file".to_string(),
        ));
    };

    let jd_text = state
        .store
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job ID not found".to_string()))?;

    let resume_text = extract_text(file.data, &file.filename).await?;
    let scorecard =
        score_submission(&state.matcher, state.analyzer.as_ref(), &jd_text, &resume_text).await;

    let record = state
        .store
        .insert_result(NewResult {
            student_id,
            job_id,
            score: scorecard.final_score,
            verdict: scorecard.semantic.verdict,
            missing_skills: scorecard.semantic.missing_skills,
            feedback: scorecard.semantic.feedback,
        })
        .await?;

    info!(
        "Result {} recorded for {} on {}: {} ({})",
        record.id, record.student_id, record.job_id, record.score, record.verdict
    );
    Ok(Json(record))
}

/// GET /api/v1/results?job_id=
///
/// With `job_id`: that job's results, best score first. Without: all results,
/// newest first.
pub async fn handle_list_results(
    State(state): State<AppState>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<Vec<ResultRecord>>, AppError> {
    let job_id = params
        .job_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    Ok(Json(state.store.list_results(job_id).await?))
}
