//! Axum route handlers for job descriptions.

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::extraction::upload::parse_multipart;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobDetailResponse {
    pub job_id: String,
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub jd_text: Option<String>,
}

/// POST /api/v1/upload_jd
///
/// Multipart `job_id` + `file`. Creates the job or replaces its text.
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let mut form = parse_multipart(multipart).await?;
    let job_id = form.field("job_id").map(str::to_string);
    let (Some(job_id), Some(file)) = (job_id, form.file.take()) else {
        return Err(AppError::Validation("Missing job_id or file".to_string()));
    };

    let jd_text = extract_text(file.data, &file.filename).await?;
    state.store.upsert_job(&job_id, &jd_text).await?;

    Ok(Json(MessageResponse {
        message: format!("JD '{}' uploaded for job_id '{job_id}'", file.filename),
    }))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.list_job_ids().await?))
}

/// GET /api/v1/job/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let jd_text = state
        .store
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job ID not found".to_string()))?;

    Ok(Json(JobDetailResponse { job_id, jd_text }))
}

/// PUT /api/v1/job/:job_id
///
/// Body `{"jd_text": "..."}`. The new text is stored lowercased.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    payload: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let jd_text = payload
        .ok()
        .and_then(|Json(body)| body.jd_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing jd_text in request body".to_string()))?;

    if !state.store.update_job(&job_id, &jd_text.to_lowercase()).await? {
        return Err(AppError::NotFound("Job ID not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: format!("Job ID '{job_id}' was successfully updated."),
    }))
}

/// DELETE /api/v1/job/:job_id
///
/// Removes the job and every result recorded against it.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_job(&job_id).await?;

    Ok(Json(MessageResponse {
        message: format!("Job ID '{job_id}' and all associated results have been deleted."),
    }))
}
