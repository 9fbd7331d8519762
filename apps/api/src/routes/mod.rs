pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job descriptions
        .route("/api/v1/upload_jd", post(jobs::handle_upload_jd))
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route(
            "/api/v1/job/:job_id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Resume scoring
        .route("/api/v1/upload_resume", post(scoring::handle_upload_resume))
        .route("/api/v1/results", get(scoring::handle_list_results))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::db::test_pool;
    use crate::models::result::{NewResult, Verdict};
    use crate::scoring::hard_match::KeywordMatcher;
    use crate::scoring::semantic::SemanticAnalysis;
    use crate::scoring::tests::FixedAnalyzer;
    use crate::store::JobStore;

    const BOUNDARY: &str = "XRESUMECHECKBOUNDARY";

    async fn test_app(analysis: SemanticAnalysis) -> (Router, JobStore) {
        test_app_with_limit(analysis, 1024 * 1024).await
    }

    async fn test_app_with_limit(analysis: SemanticAnalysis, max_upload_bytes: usize) -> (Router, JobStore) {
        let store = JobStore::new(test_pool().await);
        let state = AppState {
            store: store.clone(),
            matcher: Arc::new(KeywordMatcher::default()),
            analyzer: Arc::new(FixedAnalyzer(analysis)),
        };
        (build_router(state, max_upload_bytes), store)
    }

    fn multipart_request(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn upload_jd(app: &Router, job_id: &str, text: &str) {
        let (status, _) = send(
            app,
            multipart_request(
                "/api/v1/upload_jd",
                &[("job_id", job_id)],
                Some(("jd.txt", text.as_bytes())),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    fn high_analysis() -> SemanticAnalysis {
        SemanticAnalysis {
            semantic_score: 80,
            verdict: Verdict::High,
            missing_skills: vec!["sql".to_string()],
            feedback: "Solid backend profile.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_oversized_upload_is_payload_too_large() {
        let (app, store) = test_app_with_limit(high_analysis(), 256).await;
        let big = vec![b'a'; 4096];
        let (status, body) = send(
            &app,
            multipart_request("/api/v1/upload_jd", &[("job_id", "big-1")], Some(("jd.txt", &big))),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert!(store.get_job("big-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_multipart_is_bad_request() {
        let (app, _) = test_app(high_analysis()).await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/upload_jd")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_id\"\r\n\r\nunterminated")))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app(high_analysis()).await;
        let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_upload_jd_then_fetch_returns_lowercased_text() {
        let (app, _) = test_app(high_analysis()).await;
        upload_jd(&app, "SWE-001", "Looking for a Python and SQL Developer").await;

        let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/job/SWE-001")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_id"], "SWE-001");
        assert_eq!(body["jd_text"], "looking for a python and sql developer");
    }

    #[tokio::test]
    async fn test_upload_jd_without_file_is_400() {
        let (app, store) = test_app(high_analysis()).await;
        let (status, body) = send(
            &app,
            multipart_request("/api/v1/upload_jd", &[("job_id", "SWE-001")], None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(store.list_job_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_jd_without_job_id_is_400() {
        let (app, _) = test_app(high_analysis()).await;
        let (status, _) = send(
            &app,
            multipart_request("/api/v1/upload_jd", &[("job_id", "  ")], Some(("jd.txt", b"text"))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_jobs_ascending() {
        let (app, _) = test_app(high_analysis()).await;
        for id in ["ds-2", "swe-1", "ai-3"] {
            upload_jd(&app, id, "text").await;
        }
        let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/jobs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["ai-3", "ds-2", "swe-1"]));
    }

    #[tokio::test]
    async fn test_get_unknown_job_is_404() {
        let (app, _) = test_app(high_analysis()).await;
        let (status, _) = send(&app, empty_request(Method::GET, "/api/v1/job/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_job_stores_lowercased_text() {
        let (app, _) = test_app(high_analysis()).await;
        upload_jd(&app, "swe-1", "old text").await;

        let (status, _) = send(
            &app,
            json_request(Method::PUT, "/api/v1/job/swe-1", json!({"jd_text": "New DOCKER Role"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, empty_request(Method::GET, "/api/v1/job/swe-1")).await;
        assert_eq!(body["jd_text"], "new docker role");
    }

    #[tokio::test]
    async fn test_update_job_without_text_is_400() {
        let (app, _) = test_app(high_analysis()).await;
        upload_jd(&app, "swe-1", "old text").await;

        let (status, _) = send(&app, json_request(Method::PUT, "/api/v1/job/swe-1", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(Method::PUT, "/api/v1/job/swe-1", json!({"jd_text": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_unknown_job_is_404() {
        let (app, _) = test_app(high_analysis()).await;
        let (status, _) = send(
            &app,
            json_request(Method::PUT, "/api/v1/job/nope", json!({"jd_text": "text"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_job_removes_job_and_results() {
        let (app, store) = test_app(high_analysis()).await;
        upload_jd(&app, "swe-1", "python").await;
        upload_jd(&app, "swe-2", "python").await;
        store
            .insert_result(NewResult {
                student_id: "s1".to_string(),
                job_id: "swe-1".to_string(),
                score: 70,
                verdict: Verdict::High,
                missing_skills: vec![],
                feedback: String::new(),
            })
            .await
            .unwrap();

        let (status, _) = send(&app, empty_request(Method::DELETE, "/api/v1/job/swe-1")).await;
        assert_eq!(status, StatusCode::OK);

        let (_, jobs) = send(&app, empty_request(Method::GET, "/api/v1/jobs")).await;
        assert_eq!(jobs, json!(["swe-2"]));
        let (_, results) = send(&app, empty_request(Method::GET, "/api/v1/results")).await;
        assert_eq!(results, json!([]));
    }

    #[tokio::test]
    async fn test_delete_unknown_job_is_404() {
        let (app, _) = test_app(high_analysis()).await;
        let (status, _) = send(&app, empty_request(Method::DELETE, "/api/v1/job/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_resume_for_unknown_job_is_404_and_writes_nothing() {
        let (app, store) = test_app(high_analysis()).await;
        let (status, _) = send(
            &app,
            multipart_request(
                "/api/v1/upload_resume",
                &[("student_id", "alice"), ("job_id", "ghost")],
                Some(("cv.txt", b"python")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(store.list_results(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_resume_missing_student_is_400() {
        let (app, _) = test_app(high_analysis()).await;
        upload_jd(&app, "swe-1", "python").await;
        let (status, _) = send(
            &app,
            multipart_request(
                "/api/v1/upload_resume",
                &[("job_id", "swe-1")],
                Some(("cv.txt", b"python")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_resume_returns_blended_record() {
        let (app, _) = test_app(high_analysis()).await;
        upload_jd(&app, "swe-1", "Looking for a Python and SQL developer").await;

        let (status, body) = send(
            &app,
            multipart_request(
                "/api/v1/upload_resume",
                &[("student_id", "alice"), ("job_id", "swe-1")],
                Some(("cv.txt", b"I know Python and Java")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // 0.4 * 50 + 0.6 * 80
        assert_eq!(body["score"], 68);
        assert_eq!(body["verdict"], "High");
        assert_eq!(body["student_id"], "alice");
        assert_eq!(body["job_id"], "swe-1");
        assert_eq!(body["missing_skills"], json!(["sql"]));
        assert!(body["id"].is_i64());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_failed_analysis_still_returns_200_with_error_verdict() {
        let (app, store) = test_app(SemanticAnalysis::fallback()).await;
        upload_jd(&app, "swe-1", "Looking for a Python and SQL developer").await;

        let (status, body) = send(
            &app,
            multipart_request(
                "/api/v1/upload_resume",
                &[("student_id", "bob"), ("job_id", "swe-1")],
                Some(("cv.txt", b"I know Python and Java")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verdict"], "Error");
        assert_eq!(body["score"], 20);
        assert_eq!(body["missing_skills"], json!([]));
        assert_eq!(store.list_results(Some("swe-1")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_results_filter_by_job() {
        let (app, _) = test_app(high_analysis()).await;
        upload_jd(&app, "swe-1", "python").await;
        upload_jd(&app, "swe-2", "python").await;
        for (student, job) in [("a", "swe-1"), ("b", "swe-2"), ("c", "swe-1")] {
            let (status, _) = send(
                &app,
                multipart_request(
                    "/api/v1/upload_resume",
                    &[("student_id", student), ("job_id", job)],
                    Some(("cv.txt", b"python")),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, filtered) = send(&app, empty_request(Method::GET, "/api/v1/results?job_id=swe-1")).await;
        let filtered = filtered.as_array().unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r["job_id"] == "swe-1"));
        assert_eq!(filtered[0]["missing_skills"], json!(["sql"]));

        let (_, all) = send(&app, empty_request(Method::GET, "/api/v1/results?job_id=")).await;
        assert_eq!(all.as_array().unwrap().len(), 3);
    }
}
