//! Prompt composition
//!
//! Turns a user-supplied fragment and the current weather into the caption
//! sent to the image generator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::weather::WeatherSnapshot;

/// Coarse time-of-day label used in prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Night,
}

impl TimeOfDay {
    /// Classify a wall-clock hour
    ///
    /// Ranges are open at the bottom and closed at the top:
    /// (6, 12] is morning, (12, 18] is afternoon, everything else is night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            7..=12 => Self::Morning,
            13..=18 => Self::Afternoon,
            _ => Self::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Request to generate images for a prompt fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub fragment: String,
}

impl PromptRequest {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }
}

/// Build the generation caption
pub fn compose_prompt(fragment: &str, weather: &WeatherSnapshot, time_of_day: TimeOfDay) -> String {
    format!(
        "{fragment}, {} with a temperature of {} degrees and a wind speed of {} miles per hour in the {time_of_day} with a humidity of {} percent.",
        weather.description, weather.temperature, weather.wind_speed, weather.humidity,
    )
}
