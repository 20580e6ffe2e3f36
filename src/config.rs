//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the surf-config.toml file.
//! It lists the surf breaks to score, with their static reference data and nearest
//! NOAA stations, plus fetch settings shared by every refresh.

use crate::fusion::DEFAULT_EXPOSURE_FACTOR;
use crate::BreakInfo;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "surf-config.toml";

/// Errors that can occur while reading or writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from surf-config.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Fetch and storage settings
    #[serde(default)]
    pub fetch: FetchSettings,
    /// Breaks to score
    #[serde(default)]
    pub breaks: Vec<BreakConfig>,
}

/// Settings shared by every refresh run
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Forecast days to request, today included
    pub forecast_days: u32,
    /// Breaks fetched concurrently per batch
    pub batch_size: usize,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
    /// JSON file holding the latest report per break
    pub report_path: PathBuf,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            forecast_days: 7,
            batch_size: 5,
            request_timeout_secs: 20,
            report_path: PathBuf::from("surf-reports.json"),
        }
    }
}

/// Kind of sea floor the wave breaks over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakType {
    Beach,
    Reef,
    Point,
}

impl BreakType {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakType::Beach => "beach",
            BreakType::Reef => "reef",
            BreakType::Point => "point",
        }
    }
}

/// A configured surf break
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BreakConfig {
    /// Stable identifier, used as the report key
    pub id: String,
    pub name: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub break_type: BreakType,
    /// Compass bearing the break faces
    pub orientation_deg: f64,
    pub optimal_swell_dir_min: f64,
    pub optimal_swell_dir_max: f64,
    /// Optimal tide window in feet above MLLW
    pub optimal_tide_low: f64,
    pub optimal_tide_high: f64,
    /// NOAA CO-OPS station id (e.g., "9414290" for San Francisco)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_tide_station: Option<String>,
    /// NDBC buoy id (e.g., "46026")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_buoy_station: Option<String>,
    /// Swell-to-face height multiplier, 0.7 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure_factor: Option<f64>,
}

impl BreakConfig {
    /// Reference data the scoring engine needs for this break.
    pub fn info(&self) -> BreakInfo {
        BreakInfo {
            orientation_deg: self.orientation_deg,
            optimal_swell_dir_min: self.optimal_swell_dir_min,
            optimal_swell_dir_max: self.optimal_swell_dir_max,
            optimal_tide_low: self.optimal_tide_low,
            optimal_tide_high: self.optimal_tide_high,
        }
    }

    pub fn exposure(&self) -> f64 {
        self.exposure_factor.unwrap_or(DEFAULT_EXPOSURE_FACTOR)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fetch: FetchSettings::default(),
            breaks: vec![BreakConfig {
                id: "ocean-beach-sf".to_string(),
                name: "Ocean Beach".to_string(),
                region: "San Francisco, CA".to_string(),
                latitude: 37.7594,
                longitude: -122.5107,
                break_type: BreakType::Beach,
                orientation_deg: 270.0,
                optimal_swell_dir_min: 250.0,
                optimal_swell_dir_max: 300.0,
                optimal_tide_low: 1.0,
                optimal_tide_high: 4.0,
                nearest_tide_station: Some("9414290".to_string()),
                nearest_buoy_station: Some("46026".to_string()),
                exposure_factor: Some(DEFAULT_EXPOSURE_FACTOR),
            }],
        }
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load_from_path(path) {
            Ok(config) => {
                info!(path = %path.display(), breaks = config.breaks.len(), "loaded configuration");
                config
            }
            Err(ConfigError::Io(_)) => {
                info!(path = %path.display(), "no config file found, using default configuration");
                Self::default()
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "invalid config file, using default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration, reporting why it could not be read
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str::<Config>(&contents)?)
    }

    /// Save current configuration to the given path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Look up a configured break by id
    pub fn find_break(&self, id: &str) -> Option<&BreakConfig> {
        self.breaks.iter().find(|b| b.id == id)
    }
}
