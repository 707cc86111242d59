//! Job Submission Service
//!
//! Owns the one piece of shared state, the artifact list of the most recent
//! job, and supervises the background tasks that produce it.
//!
//! Every submission gets a fresh [`JobId`]. Only the job holding the latest
//! id may publish results; older jobs are cancelled when superseded and any
//! result they still deliver is dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use skyprompt_core::domain::job::{ArtifactSet, JobId, JobReport, JobStatus};
use skyprompt_core::domain::prompt::PromptRequest;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::service::runner::{JobError, JobRunner};

/// Handle to the job state, cheap to clone
#[derive(Clone)]
pub struct JobManager {
    runner: JobRunner,
    board: Arc<Mutex<Board>>,
    tasks: TaskTracker,
}

struct Board {
    last_id: Option<JobId>,
    current: Option<CurrentJob>,
    artifacts: Arc<Vec<String>>,
}

struct CurrentJob {
    id: JobId,
    prompt: String,
    status: JobStatus,
    submitted_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    cancel: CancellationToken,
}

impl JobManager {
    pub fn new(runner: JobRunner) -> Self {
        Self {
            runner,
            board: Arc::new(Mutex::new(Board {
                last_id: None,
                current: None,
                artifacts: Arc::new(Vec::new()),
            })),
            tasks: TaskTracker::new(),
        }
    }

    /// Clears the artifact list and starts a job in the background
    ///
    /// Returns as soon as the job is spawned. A job still running from an
    /// earlier submission is cancelled.
    pub async fn submit(&self, request: PromptRequest) -> JobId {
        let cancel = CancellationToken::new();

        let id = {
            let mut board = self.board.lock().await;
            let id = board.last_id.map_or_else(JobId::first, JobId::next);
            board.last_id = Some(id);
            board.artifacts = Arc::new(Vec::new());

            if let Some(previous) = board.current.take() {
                if !previous.status.is_terminal() {
                    info!("Job {} superseded by job {}", previous.id, id);
                    previous.cancel.cancel();
                }
            }

            board.current = Some(CurrentJob {
                id,
                prompt: request.fragment.clone(),
                status: JobStatus::Running,
                submitted_at: Utc::now(),
                finished_at: None,
                cancel: cancel.clone(),
            });
            id
        };

        info!("Job {} submitted: {}", id, request.fragment);

        let manager = self.clone();
        self.tasks.spawn(async move {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => Err(JobError::Cancelled),
                result = manager.runner.run(&request) => result,
            };
            manager.finish(id, outcome).await;
        });

        id
    }

    /// Current artifacts, or `None` while the list is empty
    pub async fn poll(&self) -> Option<ArtifactSet> {
        let board = self.board.lock().await;
        let current = board.current.as_ref()?;
        if board.artifacts.is_empty() {
            return None;
        }

        Some(ArtifactSet {
            job_id: current.id,
            artifacts: board.artifacts.as_ref().clone(),
        })
    }

    /// Status of the most recent submission
    pub async fn status(&self) -> JobReport {
        let board = self.board.lock().await;
        match &board.current {
            None => JobReport::idle(),
            Some(job) => JobReport {
                job_id: Some(job.id),
                status: job.status.clone(),
                prompt: Some(job.prompt.clone()),
                submitted_at: Some(job.submitted_at),
                finished_at: job.finished_at,
                artifact_count: board.artifacts.len(),
            },
        }
    }

    /// Cancels the in-flight job and waits for every task to wind down
    pub async fn shutdown(&self) {
        {
            let board = self.board.lock().await;
            if let Some(job) = &board.current {
                job.cancel.cancel();
            }
        }
        self.tasks.close();
        self.tasks.wait().await;
        info!("Job manager stopped");
    }

    /// Publishes a job outcome if the job is still the latest submission
    async fn finish(&self, id: JobId, outcome: Result<Vec<String>, JobError>) {
        let mut guard = self.board.lock().await;
        let board = &mut *guard;

        let Some(current) = board.current.as_mut().filter(|job| job.id == id) else {
            debug!("Discarding result of stale job {}", id);
            return;
        };

        current.finished_at = Some(Utc::now());
        match outcome {
            Ok(artifacts) => {
                info!("Job {} completed with {} artifact(s)", id, artifacts.len());
                current.status = JobStatus::Completed;
                board.artifacts = Arc::new(artifacts);
            }
            Err(e) => {
                warn!("Job {} failed: {}", id, e);
                current.status = JobStatus::Failed {
                    reason: e.to_string(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::runner::tests::{FakeGenerator, FakeWeather, runner};
    use std::time::Duration;

    fn manager(weather: FakeWeather, generator: FakeGenerator) -> JobManager {
        JobManager::new(runner(weather, Arc::new(generator)))
    }

    fn weather() -> FakeWeather {
        FakeWeather {
            hours: vec![9, 15],
            fail: false,
        }
    }

    async fn wait_until_terminal(manager: &JobManager) -> JobReport {
        for _ in 0..200 {
            let report = manager.status().await;
            if report.status.is_terminal() {
                return report;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job did not finish in time");
    }

    #[tokio::test]
    async fn test_idle_before_first_submission() {
        let manager = manager(weather(), FakeGenerator::new(Duration::ZERO, 2));

        assert!(manager.poll().await.is_none());
        assert_eq!(manager.status().await, JobReport::idle());
    }

    #[tokio::test]
    async fn test_poll_empty_right_after_submit() {
        let manager = manager(weather(), FakeGenerator::new(Duration::from_millis(200), 2));

        let id = manager.submit(PromptRequest::new("slow river")).await;

        assert_eq!(id, JobId(1));
        assert!(manager.poll().await.is_none());
        assert_eq!(manager.status().await.status, JobStatus::Running);
    }

    #[tokio::test]
    async fn test_completed_job_publishes_artifacts() {
        let manager = manager(weather(), FakeGenerator::new(Duration::ZERO, 2));

        let id = manager.submit(PromptRequest::new("river")).await;
        let report = wait_until_terminal(&manager).await;

        assert_eq!(report.status, JobStatus::Completed);
        assert_eq!(report.artifact_count, 2);
        assert!(report.finished_at.is_some());

        let set = manager.poll().await.unwrap();
        assert_eq!(set.job_id, id);
        assert_eq!(set.artifacts, vec!["river-0", "river-1"]);
    }

    #[tokio::test]
    async fn test_zero_artifacts_completes_without_images() {
        let manager = manager(weather(), FakeGenerator::new(Duration::ZERO, 0));

        manager.submit(PromptRequest::new("river")).await;
        let report = wait_until_terminal(&manager).await;

        assert_eq!(report.status, JobStatus::Completed);
        assert_eq!(report.artifact_count, 0);
        assert!(manager.poll().await.is_none());
    }

    #[tokio::test]
    async fn test_submit_clears_previous_artifacts() {
        let manager = manager(weather(), FakeGenerator::new(Duration::from_millis(200), 1));

        manager.submit(PromptRequest::new("river")).await;
        wait_until_terminal(&manager).await;
        assert!(manager.poll().await.is_some());

        manager.submit(PromptRequest::new("slow lake")).await;
        assert!(manager.poll().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_slot_fails_and_leaves_list_empty() {
        let manager = manager(
            FakeWeather {
                hours: vec![0, 3, 6],
                fail: false,
            },
            FakeGenerator::new(Duration::ZERO, 2),
        );

        manager.submit(PromptRequest::new("river")).await;
        let report = wait_until_terminal(&manager).await;

        match report.status {
            JobStatus::Failed { reason } => assert!(reason.contains("15:00")),
            other => panic!("unexpected status: {:?}", other),
        }
        assert!(manager.poll().await.is_none());
    }

    #[tokio::test]
    async fn test_latest_submission_wins() {
        let manager = manager(weather(), FakeGenerator::new(Duration::from_millis(300), 2));

        let first = manager.submit(PromptRequest::new("slow desert")).await;
        let second = manager.submit(PromptRequest::new("forest")).await;
        assert!(second > first);

        let report = wait_until_terminal(&manager).await;
        assert_eq!(report.job_id, Some(second));
        assert_eq!(report.status, JobStatus::Completed);

        // Give the superseded job time to finish if cancellation failed
        tokio::time::sleep(Duration::from_millis(400)).await;

        let set = manager.poll().await.unwrap();
        assert_eq!(set.job_id, second);
        assert_eq!(set.artifacts, vec!["forest-0", "forest-1"]);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let manager = manager(weather(), FakeGenerator::new(Duration::from_millis(300), 1));

        let first = manager.submit(PromptRequest::new("slow desert")).await;
        let second = manager.submit(PromptRequest::new("slow forest")).await;

        manager
            .finish(first, Ok(vec!["stale.png".to_string()]))
            .await;

        assert!(manager.poll().await.is_none());
        let report = manager.status().await;
        assert_eq!(report.job_id, Some(second));
        assert_eq!(report.status, JobStatus::Running);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_running_job() {
        let manager = manager(weather(), FakeGenerator::new(Duration::from_secs(30), 1));

        manager.submit(PromptRequest::new("slow glacier")).await;
        tokio::time::timeout(Duration::from_secs(2), manager.shutdown())
            .await
            .unwrap();

        let report = manager.status().await;
        assert!(matches!(report.status, JobStatus::Failed { .. }));
        assert!(manager.poll().await.is_none());
    }
}
