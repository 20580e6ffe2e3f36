//! # Surf Report Core Library
//!
//! This library turns ocean, wind and tide readings for a named surf break into a
//! single 0–100 quality score with a human-readable label.
//!
//! ## Design Philosophy
//!
//! ### Pure Scoring Core
//! - **No I/O in the engine**: [`scoring`], [`fusion`] and [`geometry`] are plain
//!   functions over immutable inputs. Identical inputs always give the same score.
//! - **Unit-pure inputs**: the engine only ever sees feet, mph, seconds and degrees.
//!   Conversion from meters, km/h and m/s happens at the collaborator boundary in
//!   [`sources`] using the constants in [`units`].
//! - **Explicit absence**: tide data is an `Option`, never a sentinel value.
//!
//! ### Data Flow
//! 1. **Fetch**: marine forecast (required), buoy observation and tide readings (optional)
//! 2. **Fuse**: buoy readings override the forecast when present and non-zero
//! 3. **Score**: five independent sub-scores summed and clamped to 100
//! 4. **Store**: per-break reports written to a JSON file, one entry per break
//!
//! ## Core Types
//! - [`BreakInfo`]: static per-break reference data consumed by the engine
//! - [`ConditionsInput`]: one day's fused conditions, the engine's second argument
//! - [`MarineForecastDay`], [`BuoyObservation`], [`TideConditions`]: collaborator outputs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod fusion;
pub mod geometry;
pub mod renderer;
pub mod report;
pub mod scoring;
pub mod sources;
pub mod store;
pub mod units;

/// Static reference data for a surf break, as consumed by the scoring engine.
///
/// Bearings are compass degrees (0 = North, clockwise). The swell window may
/// wrap across north, e.g. `optimal_swell_dir_min = 340`, `optimal_swell_dir_max = 20`.
///
/// # Example
/// ```
/// use surf_report_lib::BreakInfo;
///
/// // A west-facing beach that likes west swell and mid tide
/// let info = BreakInfo {
///     orientation_deg: 270.0,
///     optimal_swell_dir_min: 260.0,
///     optimal_swell_dir_max: 280.0,
///     optimal_tide_low: 1.0,
///     optimal_tide_high: 4.0,
/// };
/// assert!(info.optimal_tide_low < info.optimal_tide_high);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakInfo {
    /// Direction the break faces; wind from the opposite bearing is offshore
    pub orientation_deg: f64,
    /// Start of the optimal swell window (degrees)
    pub optimal_swell_dir_min: f64,
    /// End of the optimal swell window (degrees)
    pub optimal_swell_dir_max: f64,
    /// Lowest tide height in feet that still works
    pub optimal_tide_low: f64,
    /// Highest tide height in feet that still works
    pub optimal_tide_high: f64,
}

/// One day's conditions at a break, already fused and converted to engine units.
///
/// `wave_height_ft` is the estimated face height, i.e. swell height scaled by
/// the break's exposure factor, not the open-ocean reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionsInput {
    /// Estimated face height in feet
    pub wave_height_ft: f64,
    /// Swell period in seconds
    pub swell_period_s: f64,
    /// Bearing the swell arrives from
    pub swell_direction_deg: f64,
    /// Wind speed in mph
    pub wind_speed_mph: f64,
    /// Bearing the wind blows from
    pub wind_direction_deg: f64,
    /// Tide height in feet, `None` when the break has no tide reading
    pub tide_height_ft: Option<f64>,
}

/// Categorical tide phase derived from neighbouring predictions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideState {
    Rising,
    Falling,
    High,
    Low,
}

impl TideState {
    pub fn as_str(self) -> &'static str {
        match self {
            TideState::Rising => "rising",
            TideState::Falling => "falling",
            TideState::High => "high",
            TideState::Low => "low",
        }
    }
}

/// A tide reading from a NOAA station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideConditions {
    /// Predicted height above MLLW in feet
    pub tide_height_ft: f64,
    pub tide_state: TideState,
}

/// Latest real-time observation from an NDBC buoy.
///
/// A field of `0.0` means the buoy reported nothing for it (NDBC marks missing
/// columns with `MM`); the fusion step treats zero as absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuoyObservation {
    pub wave_height_ft: f64,
    pub dominant_period_s: f64,
    pub wind_speed_mph: f64,
    pub wind_direction_deg: f64,
    pub observed_at: DateTime<Utc>,
}

/// One day of the marine + wind forecast for a break's coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarineForecastDay {
    pub date: NaiveDate,
    /// Combined significant wave height in feet
    pub wave_height_ft: f64,
    /// Swell component height in feet
    pub swell_height_ft: f64,
    pub swell_period_s: f64,
    pub swell_direction_deg: f64,
    /// Locally generated wind wave height in feet
    pub wind_wave_height_ft: f64,
    pub wind_speed_mph: f64,
    pub wind_direction_deg: f64,
}
