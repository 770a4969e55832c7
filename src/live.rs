//! # Live Transit and Weather Inputs
//!
//! Input shapes handed to the engine by the containing service each refresh
//! cycle. Everything is optional: the engine degrades to scheduled/default
//! values when a field is absent, and an entirely empty [`LiveData`] is a
//! valid input that yields a fallback-tagged display.
//!
//! These types deserialize straight from provider JSON; fetching and retrying
//! live in the containing service, never here.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One upcoming departure reported by the transit authority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiveDeparture {
    /// Route identifier, matched exactly against a transit leg's route number
    pub route_number: String,
    pub scheduled: Option<DateTime<Local>>,
    pub estimated: Option<DateTime<Local>>,
    pub platform: Option<String>,
    /// Minutes behind schedule (0 = on time)
    #[serde(default)]
    pub delay_minutes: i64,
    #[serde(default)]
    pub cancelled: bool,
}

impl LiveDeparture {
    /// Best known departure instant: estimated if present, else scheduled.
    pub fn departure_time(&self) -> Option<DateTime<Local>> {
        self.estimated.or(self.scheduled)
    }
}

/// A service alert from the transit authority.
///
/// `line_name` is free text; it is matched by substring against a step's
/// route number (see `engine::route_matches_line`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Disruption {
    /// "suspension", "diversion", "delay", or anything else (ignored)
    #[serde(rename = "type")]
    pub disruption_type: String,
    pub line_name: String,
    pub description: String,
    #[serde(default)]
    pub affects_journey: bool,
    pub delay_minutes: Option<i64>,
}

/// Current weather observation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Temperature in °C
    pub temperature: f64,
    /// Free-text condition (e.g. "Partly cloudy", "Light rain")
    pub condition: String,
}

/// Everything live the scheduler gathered this cycle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LiveData {
    #[serde(default)]
    pub departures: Vec<LiveDeparture>,
    #[serde(default)]
    pub disruptions: Vec<Disruption>,
    pub weather: Option<WeatherObservation>,
}

impl LiveData {
    /// True when no provider returned anything this cycle.
    pub fn is_empty(&self) -> bool {
        self.departures.is_empty() && self.disruptions.is_empty() && self.weather.is_none()
    }
}
