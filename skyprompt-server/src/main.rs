//! Skyprompt Server
//!
//! Accepts prompt fragments over HTTP, enriches them with the current
//! weather forecast and generates images for them in the background.
//! Clients poll for the resulting image references.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod provider;
pub mod service;

use crate::config::Config;
use crate::provider::{LabsClient, OpenWeatherClient};
use crate::service::{JobManager, JobRunner};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyprompt_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Skyprompt Server...");

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        "Forecast location: lat={}, lon={}, slot={:02}:00",
        config.latitude,
        config.longitude,
        config.forecast_hour
    );

    let http = reqwest::Client::builder()
        .timeout(config.call_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let weather = OpenWeatherClient::new(
        http.clone(),
        &config.weather_api_url,
        &config.weather_api_key,
        config.latitude,
        config.longitude,
        &config.weather_units,
    );

    let generator = LabsClient::new(
        http,
        &config.generation_api_url,
        &config.generation_api_key,
        config.batch_size,
        config.generation_poll_interval,
    );

    let runner = JobRunner::new(
        Arc::new(weather),
        Arc::new(generator),
        config.forecast_hour,
        config.call_timeout,
    );
    let manager = JobManager::new(runner);

    // Build router with all API endpoints
    let app = api::create_router(manager.clone());

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    manager.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
