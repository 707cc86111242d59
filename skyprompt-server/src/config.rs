//! Server configuration
//!
//! Defines every tunable of the service: bind address, the weather and
//! image-generation providers, and the timeouts applied to external calls.
//! Credentials are only ever read from the environment.

use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (e.g., "0.0.0.0:5000")
    pub bind_addr: String,

    /// Weather provider base URL (e.g., "http://api.openweathermap.org")
    pub weather_api_url: String,

    /// Weather provider API key
    pub weather_api_key: String,

    /// Forecast location
    pub latitude: f64,
    pub longitude: f64,

    /// Measurement system requested from the weather provider
    pub weather_units: String,

    /// Hour of day whose forecast slot feeds the prompt
    pub forecast_hour: u32,

    /// Image generation base URL (e.g., "https://labs.openai.com/api/labs")
    pub generation_api_url: String,

    /// Bearer credential for the image generator
    pub generation_api_key: String,

    /// Number of images requested per job
    pub batch_size: u32,

    /// How often a pending generation task is re-checked
    pub generation_poll_interval: Duration,

    /// Upper bound on each external call (weather fetch, full generation)
    pub call_timeout: Duration,
}

impl Config {
    /// Creates a configuration with defaults and the given credentials
    pub fn new(weather_api_key: String, generation_api_key: String) -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            weather_api_url: "http://api.openweathermap.org".to_string(),
            weather_api_key,
            latitude: 36.082157,
            longitude: -94.171852,
            weather_units: "imperial".to_string(),
            forecast_hour: 15,
            generation_api_url: "https://labs.openai.com/api/labs".to_string(),
            generation_api_key,
            batch_size: 4,
            generation_poll_interval: Duration::from_secs(3),
            call_timeout: Duration::from_secs(120),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - WEATHER_API_KEY (required)
    /// - GENERATION_API_KEY (required)
    /// - SKYPROMPT_BIND_ADDR (optional, default: 0.0.0.0:5000)
    /// - WEATHER_API_URL (optional)
    /// - WEATHER_LAT / WEATHER_LON (optional, default: 36.082157 / -94.171852)
    /// - WEATHER_UNITS (optional, default: imperial)
    /// - FORECAST_HOUR (optional, default: 15)
    /// - GENERATION_API_URL (optional)
    /// - GENERATION_BATCH_SIZE (optional, default: 4)
    /// - GENERATION_POLL_INTERVAL (optional, seconds, default: 3)
    /// - CALL_TIMEOUT (optional, seconds, default: 120)
    pub fn from_env() -> anyhow::Result<Self> {
        let weather_api_key = std::env::var("WEATHER_API_KEY")
            .map_err(|_| anyhow::anyhow!("WEATHER_API_KEY environment variable not set"))?;

        let generation_api_key = std::env::var("GENERATION_API_KEY")
            .map_err(|_| anyhow::anyhow!("GENERATION_API_KEY environment variable not set"))?;

        let mut config = Self::new(weather_api_key, generation_api_key);

        if let Ok(addr) = std::env::var("SKYPROMPT_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("WEATHER_API_URL") {
            config.weather_api_url = url;
        }
        if let Ok(url) = std::env::var("GENERATION_API_URL") {
            config.generation_api_url = url;
        }
        if let Ok(units) = std::env::var("WEATHER_UNITS") {
            config.weather_units = units;
        }

        config.latitude = parse_env("WEATHER_LAT").unwrap_or(config.latitude);
        config.longitude = parse_env("WEATHER_LON").unwrap_or(config.longitude);
        config.forecast_hour = parse_env("FORECAST_HOUR").unwrap_or(config.forecast_hour);
        config.batch_size = parse_env("GENERATION_BATCH_SIZE").unwrap_or(config.batch_size);

        config.generation_poll_interval = parse_env("GENERATION_POLL_INTERVAL")
            .map(Duration::from_secs)
            .unwrap_or(config.generation_poll_interval);

        config.call_timeout = parse_env("CALL_TIMEOUT")
            .map(Duration::from_secs)
            .unwrap_or(config.call_timeout);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.weather_api_key.is_empty() {
            anyhow::bail!("weather_api_key cannot be empty");
        }

        if self.generation_api_key.is_empty() {
            anyhow::bail!("generation_api_key cannot be empty");
        }

        for url in [&self.weather_api_url, &self.generation_api_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("provider URL '{}' must start with http:// or https://", url);
            }
        }

        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            anyhow::bail!(
                "coordinates out of range: lat={}, lon={}",
                self.latitude,
                self.longitude
            );
        }

        if self.forecast_hour > 23 {
            anyhow::bail!("forecast_hour must be between 0 and 23");
        }

        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be greater than 0");
        }

        if self.generation_poll_interval.is_zero() {
            anyhow::bail!("generation_poll_interval must be greater than 0");
        }

        if self.call_timeout.is_zero() {
            anyhow::bail!("call_timeout must be greater than 0");
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("weather-key".to_string(), "sess-key".to_string())
    }

    #[test]
    fn test_default_config() {
        let config = config();
        assert_eq!(config.forecast_hour, 15);
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.call_timeout, Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();

        config.generation_api_key = String::new();
        assert!(config.validate().is_err());
        config.generation_api_key = "sess-key".to_string();

        config.weather_api_url = "api.openweathermap.org".to_string();
        assert!(config.validate().is_err());
        config.weather_api_url = "http://api.openweathermap.org".to_string();

        config.forecast_hour = 24;
        assert!(config.validate().is_err());
        config.forecast_hour = 0;
        assert!(config.validate().is_ok());

        config.latitude = 91.0;
        assert!(config.validate().is_err());
        config.latitude = 36.0;

        config.call_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
