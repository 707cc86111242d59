//! Task-based text-to-image client
//!
//! Generation is asynchronous on the provider side: a task is created with
//! the caption, then polled until it either succeeds (and carries the
//! generated images) or is rejected.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ImageGenerator, ProviderError};

/// One generated image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRecord {
    pub id: Option<String>,
    /// Where the image can be fetched from
    pub image_path: String,
}

/// Client for the labs task API
#[derive(Debug, Clone)]
pub struct LabsClient {
    base_url: String,
    bearer: String,
    batch_size: u32,
    poll_interval: Duration,
    client: Client,
}

impl LabsClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        bearer: impl Into<String>,
        batch_size: u32,
        poll_interval: Duration,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: bearer.into(),
            batch_size,
            poll_interval,
            client,
        }
    }

    async fn create_task(&self, prompt: &str) -> Result<Task, ProviderError> {
        let url = format!("{}/tasks", self.base_url);
        let body = CreateTask {
            task_type: "text2im",
            prompt: Caption {
                caption: prompt,
                batch_size: self.batch_size,
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.bearer)
            .json(&body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, ProviderError> {
        let url = format!("{}/tasks/{}", self.base_url, task_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn handle_response(response: reqwest::Response) -> Result<Task, ProviderError> {
        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse task: {}", e)))
    }
}

#[async_trait]
impl ImageGenerator for LabsClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<GenerationRecord>, ProviderError> {
        let mut task = self.create_task(prompt).await?;
        info!("Generation task {} created", task.id);

        loop {
            match task.status.as_str() {
                "succeeded" => break,
                "rejected" | "failed" => {
                    let reason = task
                        .status_information
                        .and_then(|info| info.message)
                        .unwrap_or_else(|| task.status.clone());
                    return Err(ProviderError::Rejected(reason));
                }
                status => {
                    debug!("Task {} is {}, waiting {:?}", task.id, status, self.poll_interval);
                    tokio::time::sleep(self.poll_interval).await;
                    let next = self.get_task(&task.id).await?;
                    task = next;
                }
            }
        }

        let generations = task.generations.ok_or_else(|| {
            ProviderError::Parse(format!("Task {} succeeded without generations", task.id))
        })?;

        Ok(generations
            .data
            .into_iter()
            .map(|item| GenerationRecord {
                id: item.id,
                image_path: item.generation.image_path,
            })
            .collect())
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateTask<'a> {
    task_type: &'static str,
    prompt: Caption<'a>,
}

#[derive(Debug, Serialize)]
struct Caption<'a> {
    caption: &'a str,
    batch_size: u32,
}

#[derive(Debug, Deserialize)]
struct Task {
    id: String,
    status: String,
    #[serde(default)]
    status_information: Option<StatusInformation>,
    #[serde(default)]
    generations: Option<Generations>,
}

#[derive(Debug, Deserialize)]
struct StatusInformation {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Generations {
    data: Vec<GenerationItem>,
}

#[derive(Debug, Deserialize)]
struct GenerationItem {
    id: Option<String>,
    generation: Generation,
}

#[derive(Debug, Deserialize)]
struct Generation {
    image_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> LabsClient {
        LabsClient::new(
            Client::new(),
            server.uri(),
            "sess-test",
            2,
            Duration::from_millis(10),
        )
    }

    fn succeeded(paths: &[&str]) -> serde_json::Value {
        let data: Vec<_> = paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                serde_json::json!({
                    "id": format!("generation-{}", i),
                    "object": "generation",
                    "generation": { "image_path": p }
                })
            })
            .collect();
        serde_json::json!({
            "id": "task-1",
            "status": "succeeded",
            "generations": { "object": "list", "data": data }
        })
    }

    #[tokio::test]
    async fn test_generate_polls_until_succeeded() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks"))
            .and(header("authorization", "Bearer sess-test"))
            .and(body_partial_json(serde_json::json!({
                "task_type": "text2im",
                "prompt": { "caption": "a red barn", "batch_size": 2 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "task-1",
                "status": "pending"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/tasks/task-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(succeeded(&["https://cdn.example/b.png", "https://cdn.example/a.png"])),
            )
            .mount(&server)
            .await;

        let records = client(&server).generate("a red barn").await.unwrap();

        let paths: Vec<_> = records.iter().map(|r| r.image_path.as_str()).collect();
        assert_eq!(paths, vec!["https://cdn.example/b.png", "https://cdn.example/a.png"]);
        assert_eq!(records[0].id.as_deref(), Some("generation-0"));
    }

    #[tokio::test]
    async fn test_generate_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "task-2",
                "status": "rejected",
                "status_information": { "type": "error", "message": "Your prompt may contain text that is not allowed" }
            })))
            .mount(&server)
            .await;

        let err = client(&server).generate("nope").await.unwrap_err();
        assert!(err.to_string().starts_with("task rejected: "));
        match err {
            ProviderError::Rejected(reason) => assert!(reason.contains("not allowed")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid session"))
            .mount(&server)
            .await;

        let err = client(&server).generate("a red barn").await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 401, .. }));
    }
}
