//! Prompt command handlers
//!
//! Submitting prompts, polling for images and showing job status.

use std::time::Duration;

use anyhow::Result;
use colored::*;
use skyprompt_client::ServiceClient;
use skyprompt_core::domain::job::{ArtifactSet, JobId, JobReport, JobStatus};

/// Submit a prompt without waiting
pub async fn submit(client: &ServiceClient, prompt: &str) -> Result<()> {
    let accepted = client.submit_prompt(prompt).await?;

    println!(
        "{} Job {} started",
        "✓".green(),
        accepted.job_id.to_string().cyan()
    );
    println!(
        "{}",
        "  Run `skyprompt images` once it completes.".dimmed()
    );

    Ok(())
}

/// Print the images of the latest job
pub async fn images(client: &ServiceClient) -> Result<()> {
    match client.fetch_images().await? {
        Some(set) => {
            println!("{}", format!("Job {}", set.job_id).dimmed());
            print_images(&set.artifacts);
        }
        None => println!("{}", "No images found.".yellow()),
    }

    Ok(())
}

/// Print the status of the latest job
pub async fn status(client: &ServiceClient) -> Result<()> {
    let report = client.job_status().await?;
    print_report(&report);
    Ok(())
}

/// Submit a prompt and wait for its images
pub async fn generate(
    client: &ServiceClient,
    prompt: &str,
    interval: Duration,
    timeout: Duration,
) -> Result<()> {
    let accepted = client.submit_prompt(prompt).await?;
    println!(
        "{} Job {} started, waiting for images...",
        "▸".cyan(),
        accepted.job_id.to_string().cyan()
    );

    let report = client.wait_for_job(accepted.job_id, interval, timeout).await?;

    if report.job_id != Some(accepted.job_id) {
        println!(
            "{}",
            "Job was superseded by a newer submission.".yellow()
        );
        return Ok(());
    }

    match &report.status {
        JobStatus::Completed => match images_for(accepted.job_id, client.fetch_images().await?) {
            JobImages::Ready(images) => print_images(&images),
            JobImages::Missing => println!("{}", "Job completed without images.".yellow()),
            JobImages::Superseded(newer) => println!(
                "{}",
                format!("Job was superseded by job {}; its images are no longer available.", newer)
                    .yellow()
            ),
        },
        JobStatus::Failed { reason } => {
            anyhow::bail!("Job {} failed: {}", accepted.job_id, reason);
        }
        _ => print_report(&report),
    }

    Ok(())
}

/// Check the server is reachable
pub async fn health(client: &ServiceClient) -> Result<()> {
    client.health().await?;
    println!("{} Server at {} is up", "✓".green(), client.base_url());
    Ok(())
}

/// Images of a specific job, as seen through `GET /prompt`
#[derive(Debug, PartialEq)]
enum JobImages {
    Ready(Vec<String>),
    Missing,
    Superseded(JobId),
}

fn images_for(job_id: JobId, set: Option<ArtifactSet>) -> JobImages {
    match set {
        None => JobImages::Missing,
        Some(set) if set.job_id == job_id => JobImages::Ready(set.artifacts),
        Some(set) => JobImages::Superseded(set.job_id),
    }
}

fn print_images(images: &[String]) {
    println!("{}", format!("Found {} image(s):", images.len()).bold());
    for (idx, image) in images.iter().enumerate() {
        println!("  {} {}", format!("{}.", idx + 1).dimmed(), image);
    }
}

fn print_report(report: &JobReport) {
    println!("{}", "Job Status:".bold());

    let Some(job_id) = report.job_id else {
        println!("  {}", colorize_status(&report.status));
        return;
    };

    println!("  ID:        {}", job_id.to_string().cyan());
    println!("  Status:    {}", colorize_status(&report.status));
    if let Some(prompt) = &report.prompt {
        println!("  Prompt:    {}", prompt);
    }
    if let Some(submitted) = report.submitted_at {
        println!("  Submitted: {}", submitted.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(finished) = report.finished_at {
        println!("  Finished:  {}", finished.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(seconds) = elapsed_seconds(report) {
        println!("  Duration:  {}s", seconds);
    }
    println!("  Images:    {}", report.artifact_count);

    if let JobStatus::Failed { reason } = &report.status {
        println!("\n{}", "Error:".bold());
        println!("{}", reason.red());
    }
}

fn elapsed_seconds(report: &JobReport) -> Option<i64> {
    let started = report.submitted_at?;
    let finished = report.finished_at?;
    Some(finished.signed_duration_since(started).num_seconds())
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> ColoredString {
    match status {
        JobStatus::Idle => "Idle".dimmed(),
        JobStatus::Running => "Running".cyan(),
        JobStatus::Completed => "Completed".green(),
        JobStatus::Failed { .. } => "Failed".red(),
    }
}
