//! External collaborators
//!
//! The job runner talks to two third-party services: a weather forecast API
//! and a text-to-image generator. Both sit behind traits so the runner can be
//! driven by fakes in tests.

mod generation;
mod weather;

use async_trait::async_trait;
use skyprompt_core::domain::weather::Forecast;
use thiserror::Error;

pub use generation::{GenerationRecord, LabsClient};
pub use weather::OpenWeatherClient;

/// Errors raised while talking to an external provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure (DNS, connect, TLS, body read)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response did not have the expected shape
    #[error("unexpected response: {0}")]
    Parse(String),

    /// Provider accepted the request but refused to produce a result
    #[error("task rejected: {0}")]
    Rejected(String),
}

impl ProviderError {
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        ProviderError::Api { status, message }
    }
}

/// Source of weather forecasts
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetches the multi-day forecast for the configured location
    async fn fetch_forecast(&self) -> Result<Forecast, ProviderError>;
}

/// Text-to-image generation service
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates images for `prompt` and returns one record per image
    async fn generate(&self, prompt: &str) -> Result<Vec<GenerationRecord>, ProviderError>;
}
