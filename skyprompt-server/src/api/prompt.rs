//! Prompt API Handlers
//!
//! Submission and polling endpoints for generation jobs.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use skyprompt_core::domain::job::JobReport;
use skyprompt_core::domain::prompt::PromptRequest;
use skyprompt_core::dto::prompt::{JOB_ID_HEADER, NO_IMAGES_FOUND, SubmitAccepted, SubmitPrompt};

use crate::api::error::{ApiError, ApiResult};
use crate::service::JobManager;

/// GET /prompt
/// Artifacts of the latest completed job, 404 while there are none
pub async fn get_images(State(manager): State<JobManager>) -> ApiResult<impl IntoResponse> {
    let set = manager
        .poll()
        .await
        .ok_or_else(|| ApiError::NotFound(NO_IMAGES_FOUND.to_string()))?;

    tracing::debug!("Returning {} artifact(s) of job {}", set.artifacts.len(), set.job_id);

    Ok(([(JOB_ID_HEADER, set.job_id.to_string())], Json(set.artifacts)))
}

/// POST /prompt
/// Clear current artifacts and start a new generation job
pub async fn submit_prompt(
    State(manager): State<JobManager>,
    payload: Result<Json<SubmitPrompt>, JsonRejection>,
) -> ApiResult<Json<SubmitAccepted>> {
    let Json(req) = payload?;

    if req.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt cannot be empty".to_string()));
    }

    let job_id = manager.submit(PromptRequest::new(req.prompt)).await;

    Ok(Json(SubmitAccepted::ok(job_id)))
}

/// GET /prompt/status
/// State of the most recent submission
pub async fn get_status(State(manager): State<JobManager>) -> Json<JobReport> {
    Json(manager.status().await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use skyprompt_core::domain::job::JobStatus;
    use tower::ServiceExt;

    use super::*;
    use crate::api::create_router;
    use crate::service::runner::tests::{FakeGenerator, FakeWeather, runner};

    fn app() -> (Router, JobManager) {
        let weather = FakeWeather {
            hours: vec![15],
            fail: false,
        };
        let generator = Arc::new(FakeGenerator::new(Duration::from_millis(200), 2));
        let manager = JobManager::new(runner(weather, generator));
        (create_router(manager.clone()), manager)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_without_submission_returns_404() {
        let (app, _) = app();

        let response = app.oneshot(get("/prompt")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!("No images found"));
    }

    #[tokio::test]
    async fn test_submit_returns_ok_and_clears() {
        let (app, manager) = app();

        let response = app
            .clone()
            .oneshot(post_json("/prompt", r#"{"prompt": "slow harbor"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Ok", "job_id": 1 })
        );

        let response = app.oneshot(get("/prompt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(manager.status().await.status, JobStatus::Running);
    }

    #[tokio::test]
    async fn test_get_after_completion_returns_artifacts() {
        let (app, manager) = app();

        manager.submit(PromptRequest::new("harbor")).await;
        for _ in 0..100 {
            if manager.status().await.status.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let response = app.oneshot(get("/prompt")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[JOB_ID_HEADER], "1");
        assert_eq!(
            body_json(response).await,
            serde_json::json!(["harbor-0", "harbor-1"])
        );
    }

    #[tokio::test]
    async fn test_submit_missing_prompt_is_bad_request() {
        let (app, manager) = app();

        let response = app
            .oneshot(post_json("/prompt", r#"{"text": "harbor"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
        assert_eq!(manager.status().await, JobReport::idle());
    }

    #[tokio::test]
    async fn test_submit_blank_prompt_is_bad_request() {
        let (app, _) = app();

        let response = app
            .oneshot(post_json("/prompt", r#"{"prompt": "   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (app, _) = app();

        let response = app.oneshot(get("/prompt/status")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], serde_json::json!({ "state": "idle" }));
        assert!(json["job_id"].is_null());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
