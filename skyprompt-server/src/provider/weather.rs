//! OpenWeatherMap forecast client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use skyprompt_core::domain::weather::{
    Forecast, ForecastEntry, WeatherSnapshot, parse_slot_hour,
};
use tracing::debug;

use super::{ProviderError, WeatherProvider};

/// Client for the 5-day / 3-hour forecast endpoint
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    latitude: f64,
    longitude: f64,
    units: String,
    client: Client,
}

impl OpenWeatherClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        latitude: f64,
        longitude: f64,
        units: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            latitude,
            longitude,
            units: units.into(),
            client,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch_forecast(&self) -> Result<Forecast, ProviderError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", self.latitude.to_string()),
                ("lon", self.longitude.to_string()),
                ("units", self.units.clone()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse forecast: {}", e)))?;

        let entries = body.list.into_iter().filter_map(|item| {
            let Some(hour) = parse_slot_hour(&item.dt_txt) else {
                debug!("Skipping forecast entry with timestamp '{}'", item.dt_txt);
                return None;
            };
            let description = item
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .unwrap_or_default();
            Some(ForecastEntry {
                hour,
                timestamp: item.dt_txt,
                snapshot: WeatherSnapshot {
                    temperature: item.main.temp,
                    humidity: item.main.humidity,
                    wind_speed: item.wind.speed,
                    description,
                },
            })
        });

        let forecast = Forecast::new(entries);
        debug!("Fetched forecast covering {} hour slot(s)", forecast.len());
        Ok(forecast)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt_txt: String,
    main: MainReadings,
    wind: Wind,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}
