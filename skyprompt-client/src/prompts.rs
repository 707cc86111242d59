//! Prompt-related API endpoints

use std::time::Duration;

use skyprompt_core::domain::job::{ArtifactSet, JobId, JobReport};
use skyprompt_core::dto::prompt::{JOB_ID_HEADER, SubmitAccepted, SubmitPrompt};
use tracing::debug;

use crate::ServiceClient;
use crate::error::{ClientError, Result};

impl ServiceClient {
    /// Submit a prompt fragment and start a generation job
    ///
    /// Any artifacts from a previous job are cleared by the server.
    pub async fn submit_prompt(&self, prompt: &str) -> Result<SubmitAccepted> {
        let url = format!("{}/prompt", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SubmitPrompt {
                prompt: prompt.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch the artifacts of the latest job
    ///
    /// # Returns
    /// `None` while the server has no artifacts to report. Otherwise the
    /// artifacts together with the id of the job that produced them.
    pub async fn fetch_images(&self) -> Result<Option<ArtifactSet>> {
        let url = format!("{}/prompt", self.base_url);
        let response = self.client.get(&url).send().await?;

        let job_id = response
            .headers()
            .get(JOB_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map(JobId);

        let artifacts: Vec<String> = match self.handle_response(response).await {
            Ok(artifacts) => artifacts,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let job_id = job_id.ok_or_else(|| {
            ClientError::ParseError(format!("Missing or invalid {} header", JOB_ID_HEADER))
        })?;

        Ok(Some(ArtifactSet { job_id, artifacts }))
    }

    /// Get the status of the latest job
    pub async fn job_status(&self) -> Result<JobReport> {
        let url = format!("{}/prompt/status", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Poll the job status until `job_id` finishes
    ///
    /// Returns the final report, which may also describe a newer job if
    /// `job_id` was superseded in the meantime.
    pub async fn wait_for_job(
        &self,
        job_id: JobId,
        interval: Duration,
        timeout: Duration,
    ) -> Result<JobReport> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let report = self.job_status().await?;
            let superseded = report.job_id.is_some_and(|id| id > job_id);
            if superseded || report.status.is_terminal() {
                return Ok(report);
            }

            debug!("Job {} still {:?}", job_id, report.status);

            if tokio::time::Instant::now() + interval > deadline {
                return Err(ClientError::Timeout {
                    job_id,
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(interval).await;
        }
    }
}
