//! HTTP client for the resume check API. The UI talks to the backend only
//! through this module.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Connection Error: Could not connect to the backend.")]
    Connection(#[source] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from the backend: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiClientError::Api { status: 404, .. })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct JobDetail {
    jd_text: String,
}

/// A stored result as returned by `/api/v1/results` and `/api/v1/upload_resume`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultView {
    pub id: i64,
    pub student_id: String,
    pub job_id: String,
    pub score: u32,
    pub verdict: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub feedback: String,
    pub timestamp: DateTime<Utc>,
}

/// A document picked in an upload form.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub data: Bytes,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiClientError> {
        let response = request.send().await.map_err(|e| {
            warn!("Backend request failed: {e}");
            ApiClientError::Connection(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiClientError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response.json().await.map_err(ApiClientError::Decode)
    }

    pub async fn list_jobs(&self) -> Result<Vec<String>, ApiClientError> {
        self.send(self.client.get(self.url("/jobs"))).await
    }

    /// `None` when the job does not exist.
    pub async fn get_job_text(&self, job_id: &str) -> Result<Option<String>, ApiClientError> {
        match self
            .send::<JobDetail>(self.client.get(self.url(&format!("/job/{}", urlencoding::encode(job_id)))))
            .await
        {
            Ok(detail) => Ok(Some(detail.jd_text)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn upload_jd(&self, job_id: &str, file: FileUpload) -> Result<String, ApiClientError> {
        let form = Form::new()
            .text("job_id", job_id.to_string())
            .part("file", file_part(file));
        let body: MessageBody = self
            .send(self.client.post(self.url("/upload_jd")).multipart(form))
            .await?;
        Ok(body.message)
    }

    pub async fn update_job(&self, job_id: &str, jd_text: &str) -> Result<String, ApiClientError> {
        let body: MessageBody = self
            .send(
                self.client
                    .put(self.url(&format!("/job/{}", urlencoding::encode(job_id))))
                    .json(&json!({ "jd_text": jd_text })),
            )
            .await?;
        Ok(body.message)
    }

    pub async fn delete_job(&self, job_id: &str) -> Result<String, ApiClientError> {
        let body: MessageBody = self
            .send(self.client.delete(self.url(&format!("/job/{}", urlencoding::encode(job_id)))))
            .await?;
        Ok(body.message)
    }

    pub async fn upload_resume(
        &self,
        student_id: &str,
        job_id: &str,
        file: FileUpload,
    ) -> Result<ResultView, ApiClientError> {
        let form = Form::new()
            .text("student_id", student_id.to_string())
            .text("job_id", job_id.to_string())
            .part("file", file_part(file));
        self.send(self.client.post(self.url("/upload_resume")).multipart(form))
            .await
    }

    pub async fn list_results(&self, job_id: Option<&str>) -> Result<Vec<ResultView>, ApiClientError> {
        let mut request = self.client.get(self.url("/results"));
        if let Some(job_id) = job_id {
            request = request.query(&[("job_id", job_id)]);
        }
        self.send(request).await
    }
}

fn file_part(file: FileUpload) -> Part {
    Part::bytes(file.data.to_vec()).file_name(file.filename)
}

/// Message from the API's `{"error": {"message"}}` body, or a generic one.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| format!("Request failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};

    async fn spawn_backend(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error": {"code": "NOT_FOUND", "message": "Job ID not found"}}"#;
        assert_eq!(error_message(StatusCode::NOT_FOUND, body), "Job ID not found");
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>"),
            "Request failed with status 502 Bad Gateway"
        );
    }

    #[tokio::test]
    async fn test_list_jobs_and_missing_job() {
        let app = Router::new()
            .route("/api/v1/jobs", get(|| async { Json(vec!["a-1", "b-2"]) }))
            .route(
                "/api/v1/job/:job_id",
                get(|Path(job_id): Path<String>| async move {
                    if job_id == "a-1" {
                        Ok(Json(serde_json::json!({"job_id": "a-1", "jd_text": "python"})))
                    } else {
                        Err((
                            AxumStatus::NOT_FOUND,
                            Json(serde_json::json!({"error": {"code": "NOT_FOUND", "message": "Job ID not found"}})),
                        ))
                    }
                }),
            );
        let client = ApiClient::new(spawn_backend(app).await);

        assert_eq!(client.list_jobs().await.unwrap(), vec!["a-1", "b-2"]);
        assert_eq!(client.get_job_text("a-1").await.unwrap().as_deref(), Some("python"));
        assert_eq!(client.get_job_text("zzz").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_job_id_is_sent_as_one_path_segment() {
        let app = Router::new().route(
            "/api/v1/job/:job_id",
            get(|Path(job_id): Path<String>| async move {
                Json(serde_json::json!({"job_id": job_id.clone(), "jd_text": job_id}))
            }),
        );
        let client = ApiClient::new(spawn_backend(app).await);

        let echoed = client.get_job_text("ml/ai? 2024#1").await.unwrap();
        assert_eq!(echoed.as_deref(), Some("ml/ai? 2024#1"));
    }

    #[tokio::test]
    async fn test_results_are_decoded() {
        let app = Router::new().route(
            "/api/v1/results",
            get(|| async {
                Json(serde_json::json!([{
                    "id": 3,
                    "student_id": "alice",
                    "job_id": "swe-1",
                    "score": 68,
                    "verdict": "High",
                    "missing_skills": ["sql"],
                    "feedback": "Solid.",
                    "timestamp": "2024-05-01T10:00:00Z"
                }]))
            }),
        );
        let client = ApiClient::new(spawn_backend(app).await);

        let results = client.list_results(Some("swe-1")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 68);
        assert_eq!(results[0].missing_skills, vec!["sql"]);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.list_jobs().await.unwrap_err();
        assert!(matches!(err, ApiClientError::Connection(_)));
        assert_eq!(
            err.to_string(),
            "Connection Error: Could not connect to the backend."
        );
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let app = Router::new().route(
            "/api/v1/jobs",
            get(|| async {
                (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": {"code": "DATABASE_ERROR", "message": "A database error occurred"}
                    })),
                )
            }),
        );
        let client = ApiClient::new(spawn_backend(app).await);
        let err = client.list_jobs().await.unwrap_err();
        assert!(matches!(err, ApiClientError::Api { status: 500, .. }));
        assert_eq!(err.to_string(), "A database error occurred");
    }
}
