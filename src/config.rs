//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! journey-config.toml file: where the commute starts and ends, the coffee
//! stop, the ordered transit legs and any manual walking-time overrides.
//!
//! Loading never fails: a missing or malformed file falls back to the
//! built-in default journey so the device always has something to display.

use crate::geo::Coordinates;
use crate::model::TransportMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from the one fallible config operation (saving).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("serialize failed: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the coffee stop sits relative to the transit legs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CafePosition {
    BeforeTransit,
    AfterTransit,
}

/// Full journey configuration loaded from journey-config.toml
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JourneyConfig {
    pub journey: JourneySection,
    pub coffee: CoffeeConfig,
    /// Ordered transit legs, ridden in sequence
    #[serde(default)]
    pub transit: Vec<TransitLegConfig>,
    /// Manual walking-time overrides in minutes, keyed by leg name:
    /// "home_to_cafe", "cafe_to_stop", "home_to_stop", "interchange",
    /// "stop_to_work"
    #[serde(default)]
    pub walking_overrides: HashMap<String, i64>,
}

/// Origin, destination and timing for the commute.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JourneySection {
    pub home_address: String,
    pub work_address: String,
    /// Target arrival time as 24-hour "HH:MM"
    pub target_arrival: String,
    /// Australian state/territory code selecting the timezone (e.g. "VIC")
    pub region: String,
    pub home_coords: Option<Coordinates>,
    pub work_coords: Option<Coordinates>,
}

/// The optional coffee stop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoffeeConfig {
    pub enabled: bool,
    pub cafe_name: String,
    pub cafe_address: String,
    /// How long the stop takes, in minutes
    pub duration_minutes: i64,
    pub position: CafePosition,
    pub cafe_coords: Option<Coordinates>,
}

/// One configured transit leg.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitLegConfig {
    pub mode: TransportMode,
    /// Matched exactly against live departure route numbers
    pub route_number: String,
    /// Scheduled riding time in minutes
    pub duration_minutes: i64,
    pub direction: Option<String>,
    pub platform: Option<String>,
    pub origin_stop: StopConfig,
    pub destination_stop: StopConfig,
}

/// A named stop with optional coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StopConfig {
    pub name: String,
    pub coords: Option<Coordinates>,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        JourneyConfig {
            journey: JourneySection {
                home_address: "12 Sydney Rd, Brunswick VIC".to_string(),
                work_address: "727 Collins St, Docklands VIC".to_string(),
                home_coords: Some(Coordinates {
                    lat: -37.7670,
                    lon: 144.9600,
                }),
                work_coords: Some(Coordinates {
                    lat: -37.8209,
                    lon: 144.9450,
                }),
                target_arrival: "09:00".to_string(),
                region: "VIC".to_string(),
            },
            coffee: CoffeeConfig {
                enabled: true,
                cafe_name: "Padre Coffee".to_string(),
                cafe_address: "438 Sydney Rd, Brunswick VIC".to_string(),
                cafe_coords: Some(Coordinates {
                    lat: -37.7662,
                    lon: 144.9614,
                }),
                duration_minutes: 5,
                position: CafePosition::BeforeTransit,
            },
            transit: vec![TransitLegConfig {
                mode: TransportMode::Tram,
                route_number: "19".to_string(),
                direction: Some("City (Flinders St)".to_string()),
                origin_stop: StopConfig {
                    name: "Brunswick Rd/Sydney Rd".to_string(),
                    coords: Some(Coordinates {
                        lat: -37.7713,
                        lon: 144.9605,
                    }),
                },
                destination_stop: StopConfig {
                    name: "Flinders St Station".to_string(),
                    coords: Some(Coordinates {
                        lat: -37.8183,
                        lon: 144.9671,
                    }),
                },
                duration_minutes: 24,
                platform: None,
            }],
            walking_overrides: HashMap::new(),
        }
    }
}

impl JourneyConfig {
    /// Load configuration from journey-config.toml
    /// Falls back to the default journey if the file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("journey-config.toml")
    }

    /// Load configuration from specified path
    /// Falls back to the default journey if the file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<JourneyConfig>(&contents) {
                Ok(config) => {
                    println!(
                        "Loaded journey configuration: {} -> {}",
                        config.journey.home_address, config.journey.work_address
                    );
                    config
                }
                Err(e) => {
                    eprintln!("Warning: Invalid config file format: {}", e);
                    eprintln!("Using default journey configuration (Brunswick -> Docklands)");
                    Self::default()
                }
            },
            Err(_) => {
                eprintln!("Info: No config file found, using default journey configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration to journey-config.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("journey-config.toml", contents)?;
        println!("Configuration saved to journey-config.toml");
        Ok(())
    }

    /// Manual walking-time override for a named leg, if configured.
    pub fn walking_override(&self, key: &str) -> Option<i64> {
        self.walking_overrides.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JourneyConfig::default();
        assert_eq!(config.journey.target_arrival, "09:00");
        assert_eq!(config.journey.region, "VIC");
        assert!(config.coffee.enabled);
        assert_eq!(config.coffee.duration_minutes, 5);
        assert_eq!(config.coffee.position, CafePosition::BeforeTransit);
        assert_eq!(config.transit.len(), 1);
        assert_eq!(config.transit[0].route_number, "19");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = JourneyConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: JourneyConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.journey.home_address, config.journey.home_address);
        assert_eq!(parsed.coffee.cafe_name, config.coffee.cafe_name);
        assert_eq!(parsed.transit.len(), config.transit.len());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = JourneyConfig::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.journey.region, "VIC");
    }

    #[test]
    fn test_walking_override_lookup() {
        let mut config = JourneyConfig::default();
        config.walking_overrides.insert("home_to_cafe".to_string(), 3);

        assert_eq!(config.walking_override("home_to_cafe"), Some(3));
        assert_eq!(config.walking_override("stop_to_work"), None);
    }

    #[test]
    fn test_minimal_toml_parses() {
        // Transit legs and overrides are optional sections
        let toml_str = r#"
[journey]
home_address = "Home"
work_address = "Work"
target_arrival = "08:30"
region = "NSW"

[coffee]
enabled = false
cafe_name = ""
cafe_address = ""
duration_minutes = 0
position = "before_transit"
"#;
        let config: JourneyConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.coffee.enabled);
        assert!(config.transit.is_empty());
        assert!(config.walking_overrides.is_empty());
        assert!(config.journey.home_coords.is_none());
    }
}
