//! Job domain types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one submission
///
/// Issued in submission order starting at 1, so a larger id always means a
/// more recent job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of the most recent job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    /// Nothing submitted since startup
    Idle,
    Running,
    Completed,
    Failed { reason: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed { .. })
    }
}

/// Status report for the most recent submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: Option<JobId>,
    pub status: JobStatus,
    pub prompt: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub artifact_count: usize,
}

impl JobReport {
    pub fn idle() -> Self {
        Self {
            job_id: None,
            status: JobStatus::Idle,
            prompt: None,
            submitted_at: None,
            finished_at: None,
            artifact_count: 0,
        }
    }
}

/// Artifact references produced by one job, in provider order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    pub job_id: JobId,
    pub artifacts: Vec<String>,
}
