//! Prompt DTOs for the HTTP boundary

use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;

/// Body of `POST /prompt`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPrompt {
    pub prompt: String,
}

/// Acknowledgement returned once a job has been started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAccepted {
    pub message: String,
    pub job_id: JobId,
}

impl SubmitAccepted {
    pub fn ok(job_id: JobId) -> Self {
        Self {
            message: "Ok".to_string(),
            job_id,
        }
    }
}

/// Body returned by `GET /prompt` when no artifacts are available
pub const NO_IMAGES_FOUND: &str = "No images found";

/// Response header naming the job whose artifacts `GET /prompt` returned
pub const JOB_ID_HEADER: &str = "x-job-id";
