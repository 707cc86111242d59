//! Weather domain types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Conditions at a single forecast slot
///
/// Built fresh for every job and dropped once the prompt is composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub description: String,
}

/// One timestamped entry of a multi-day forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Hour of day the slot starts at (0-23)
    pub hour: u32,
    /// Provider timestamp, e.g. "2022-11-10 15:00:00"
    pub timestamp: String,
    pub snapshot: WeatherSnapshot,
}

/// Forecast indexed by hour of day
///
/// Only the earliest entry for each hour is kept, so `slot(15)` answers
/// "the next 15:00 slot" in the order the provider listed them.
#[derive(Debug, Clone, Default)]
pub struct Forecast {
    slots: BTreeMap<u32, ForecastEntry>,
}

impl Forecast {
    pub fn new(entries: impl IntoIterator<Item = ForecastEntry>) -> Self {
        let mut slots = BTreeMap::new();
        for entry in entries {
            slots.entry(entry.hour).or_insert(entry);
        }
        Self { slots }
    }

    /// Look up the snapshot for a given hour of day
    pub fn slot(&self, hour: u32) -> Option<&WeatherSnapshot> {
        self.slots.get(&hour).map(|entry| &entry.snapshot)
    }

    /// Number of distinct hours covered
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Extract the hour from a `"YYYY-MM-DD HH:MM:SS"` timestamp
pub fn parse_slot_hour(timestamp: &str) -> Option<u32> {
    let hour: u32 = timestamp.get(11..13)?.parse().ok()?;
    (hour < 24).then_some(hour)
}
