//! Generation Job Runner
//!
//! Executes one job end to end: fetch the forecast, pick the configured
//! slot, compose the caption and hand it to the image generator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use skyprompt_core::domain::prompt::{PromptRequest, TimeOfDay, compose_prompt};
use thiserror::Error;
use tracing::{debug, info};

use crate::provider::{ImageGenerator, ProviderError, WeatherProvider};

/// Reasons a job can end without artifacts
#[derive(Debug, Error)]
pub enum JobError {
    #[error("weather unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("no forecast slot for {hour:02}:00")]
    ForecastSlotNotFound { hour: u32 },

    #[error("generation provider error: {0}")]
    GenerationProvider(String),

    /// Superseded by a newer submission or stopped at shutdown
    #[error("job cancelled")]
    Cancelled,
}

/// Runs generation jobs against the configured providers
#[derive(Clone)]
pub struct JobRunner {
    weather: Arc<dyn WeatherProvider>,
    generator: Arc<dyn ImageGenerator>,
    forecast_hour: u32,
    call_timeout: Duration,
    clock: fn() -> u32,
}

impl JobRunner {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        generator: Arc<dyn ImageGenerator>,
        forecast_hour: u32,
        call_timeout: Duration,
    ) -> Self {
        Self {
            weather,
            generator,
            forecast_hour,
            call_timeout,
            clock: local_hour,
        }
    }

    /// Replaces the wall-clock hour source
    pub fn with_clock(mut self, clock: fn() -> u32) -> Self {
        self.clock = clock;
        self
    }

    /// Runs one job and returns the artifact references in provider order
    pub async fn run(&self, request: &PromptRequest) -> Result<Vec<String>, JobError> {
        let forecast = tokio::time::timeout(self.call_timeout, self.weather.fetch_forecast())
            .await
            .map_err(|_| {
                JobError::WeatherUnavailable(format!("timed out after {:?}", self.call_timeout))
            })?
            .map_err(|e| JobError::WeatherUnavailable(e.to_string()))?;

        let weather = forecast
            .slot(self.forecast_hour)
            .ok_or(JobError::ForecastSlotNotFound {
                hour: self.forecast_hour,
            })?;

        let time_of_day = TimeOfDay::from_hour((self.clock)());
        let prompt = compose_prompt(&request.fragment, weather, time_of_day);
        info!("Composed prompt: {}", prompt);

        let records = tokio::time::timeout(self.call_timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| {
                JobError::GenerationProvider(format!("timed out after {:?}", self.call_timeout))
            })?
            .map_err(|e: ProviderError| JobError::GenerationProvider(e.to_string()))?;

        debug!("Generator returned {} record(s)", records.len());

        Ok(records
            .into_iter()
            .map(|record| {
                if let Some(id) = &record.id {
                    debug!("Generation {} -> {}", id, record.image_path);
                }
                record.image_path
            })
            .collect())
    }
}

fn local_hour() -> u32 {
    chrono::Local::now().hour()
}
