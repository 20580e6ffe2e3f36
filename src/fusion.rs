//! # Condition Fusion
//!
//! Merges the sources available for one break on one day into the scoring
//! engine's [`ConditionsInput`].
//!
//! ## Precedence
//!
//! | Quantity        | Source used |
//! |-----------------|-------------|
//! | Wave height     | buoy if present and > 0, else forecast wave height |
//! | Swell height    | buoy wave height if present and > 0, else forecast swell height |
//! | Swell period    | buoy dominant period if present and > 0, else forecast |
//! | Wind speed      | buoy if present and > 0, else forecast |
//! | Wind direction  | buoy if present and > 0, else forecast |
//! | Swell direction | forecast only |
//! | Tide            | tide reading only, absent otherwise |
//!
//! A zero from the buoy feed cannot be told apart from an offline sensor, so
//! zero is treated as "no reading". A genuinely glassy 0 mph reading is lost.
//!
//! Buoys report live conditions, so only [`fuse_today`] takes one. Later
//! forecast days go through [`fuse_forecast_day`].

use crate::{BuoyObservation, ConditionsInput, MarineForecastDay, TideConditions, TideState};
use serde::{Deserialize, Serialize};

/// Exposure factor applied when a break has none configured
pub const DEFAULT_EXPOSURE_FACTOR: f64 = 0.7;

/// Conditions for one break on one day, ready to score and report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusedConditions {
    /// Fused open-ocean wave height in feet
    pub wave_height_ft: f64,
    /// Fused swell height in feet, the basis for face height
    pub swell_height_ft: f64,
    /// Swell height scaled by the break's exposure factor
    pub face_height_ft: f64,
    pub tide_state: Option<TideState>,
    /// What the scoring engine sees; `input.wave_height_ft == face_height_ft`
    pub input: ConditionsInput,
}

/// Pick the live reading when it carries data, otherwise the forecast.
fn prefer_observed(observed: Option<f64>, forecast: f64) -> f64 {
    match observed {
        Some(value) if value > 0.0 => value,
        _ => forecast,
    }
}

/// Fuse today's forecast with an optional buoy observation and tide reading.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use surf_report_lib::fusion::fuse_today;
/// use surf_report_lib::MarineForecastDay;
///
/// let forecast = MarineForecastDay {
///     date: NaiveDate::from_ymd_opt(2026, 2, 19).unwrap(),
///     wave_height_ft: 3.2,
///     swell_height_ft: 3.0,
///     swell_period_s: 11.0,
///     swell_direction_deg: 265.0,
///     wind_wave_height_ft: 0.4,
///     wind_speed_mph: 6.0,
///     wind_direction_deg: 80.0,
/// };
///
/// // No buoy, no tide station: forecast only
/// let fused = fuse_today(&forecast, None, None, 1.0);
/// assert_eq!(fused.face_height_ft, 3.0);
/// assert_eq!(fused.input.tide_height_ft, None);
/// ```
pub fn fuse_today(
    forecast: &MarineForecastDay,
    buoy: Option<&BuoyObservation>,
    tide: Option<&TideConditions>,
    exposure_factor: f64,
) -> FusedConditions {
    let buoy_wave = buoy.map(|b| b.wave_height_ft);

    let wave_height_ft = prefer_observed(buoy_wave, forecast.wave_height_ft);
    let swell_height_ft = prefer_observed(buoy_wave, forecast.swell_height_ft);
    let swell_period_s =
        prefer_observed(buoy.map(|b| b.dominant_period_s), forecast.swell_period_s);
    let wind_speed_mph = prefer_observed(buoy.map(|b| b.wind_speed_mph), forecast.wind_speed_mph);
    let wind_direction_deg = prefer_observed(
        buoy.map(|b| b.wind_direction_deg),
        forecast.wind_direction_deg,
    );

    assemble(
        wave_height_ft,
        swell_height_ft,
        swell_period_s,
        forecast.swell_direction_deg,
        wind_speed_mph,
        wind_direction_deg,
        tide,
        exposure_factor,
    )
}

/// Fuse a future forecast day with that day's tide reading, if any.
pub fn fuse_forecast_day(
    forecast: &MarineForecastDay,
    tide: Option<&TideConditions>,
    exposure_factor: f64,
) -> FusedConditions {
    fuse_today(forecast, None, tide, exposure_factor)
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    wave_height_ft: f64,
    swell_height_ft: f64,
    swell_period_s: f64,
    swell_direction_deg: f64,
    wind_speed_mph: f64,
    wind_direction_deg: f64,
    tide: Option<&TideConditions>,
    exposure_factor: f64,
) -> FusedConditions {
    let face_height_ft = swell_height_ft * exposure_factor;

    FusedConditions {
        wave_height_ft,
        swell_height_ft,
        face_height_ft,
        tide_state: tide.map(|t| t.tide_state),
        input: ConditionsInput {
            wave_height_ft: face_height_ft,
            swell_period_s,
            swell_direction_deg,
            wind_speed_mph,
            wind_direction_deg,
            tide_height_ft: tide.map(|t| t.tide_height_ft),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn forecast() -> MarineForecastDay {
        MarineForecastDay {
            date: NaiveDate::from_ymd_opt(2026, 2, 19).unwrap(),
            wave_height_ft: 3.2,
            swell_height_ft: 2.8,
            swell_period_s: 9.0,
            swell_direction_deg: 250.0,
            wind_wave_height_ft: 0.5,
            wind_speed_mph: 8.0,
            wind_direction_deg: 60.0,
        }
    }

    fn buoy(wave: f64, period: f64, speed: f64, dir: f64) -> BuoyObservation {
        BuoyObservation {
            wave_height_ft: wave,
            dominant_period_s: period,
            wind_speed_mph: speed,
            wind_direction_deg: dir,
            observed_at: Utc.with_ymd_and_hms(2026, 2, 19, 14, 50, 0).unwrap(),
        }
    }

    #[test]
    fn test_forecast_only() {
        let fused = fuse_today(&forecast(), None, None, DEFAULT_EXPOSURE_FACTOR);
        assert_eq!(fused.wave_height_ft, 3.2);
        assert_eq!(fused.swell_height_ft, 2.8);
        assert!((fused.face_height_ft - 2.8 * 0.7).abs() < 1e-12);
        assert_eq!(fused.input.wave_height_ft, fused.face_height_ft);
        assert_eq!(fused.input.swell_period_s, 9.0);
        assert_eq!(fused.input.wind_speed_mph, 8.0);
        assert_eq!(fused.input.wind_direction_deg, 60.0);
        assert_eq!(fused.input.tide_height_ft, None);
        assert_eq!(fused.tide_state, None);
    }

    #[test]
    fn test_buoy_overrides_forecast() {
        let b = buoy(5.0, 14.0, 12.0, 95.0);
        let fused = fuse_today(&forecast(), Some(&b), None, 1.0);
        assert_eq!(fused.wave_height_ft, 5.0);
        // Buoy wave height stands in for swell height too
        assert_eq!(fused.swell_height_ft, 5.0);
        assert_eq!(fused.face_height_ft, 5.0);
        assert_eq!(fused.input.swell_period_s, 14.0);
        assert_eq!(fused.input.wind_speed_mph, 12.0);
        assert_eq!(fused.input.wind_direction_deg, 95.0);
    }

    #[test]
    fn test_zero_buoy_readings_fall_back() {
        let b = buoy(0.0, 0.0, 0.0, 0.0);
        let fused = fuse_today(&forecast(), Some(&b), None, DEFAULT_EXPOSURE_FACTOR);
        assert_eq!(fused.wave_height_ft, 3.2);
        assert_eq!(fused.swell_height_ft, 2.8);
        assert_eq!(fused.input.swell_period_s, 9.0);
        assert_eq!(fused.input.wind_speed_mph, 8.0);
        // Due north from the buoy reads as 0 and is discarded as well
        assert_eq!(fused.input.wind_direction_deg, 60.0);
    }

    #[test]
    fn test_fields_fall_back_independently() {
        let b = buoy(0.0, 16.0, 0.0, 200.0);
        let fused = fuse_today(&forecast(), Some(&b), None, DEFAULT_EXPOSURE_FACTOR);
        assert_eq!(fused.wave_height_ft, 3.2);
        assert_eq!(fused.input.swell_period_s, 16.0);
        assert_eq!(fused.input.wind_speed_mph, 8.0);
        assert_eq!(fused.input.wind_direction_deg, 200.0);
    }

    #[test]
    fn test_swell_direction_always_from_forecast() {
        let b = buoy(4.0, 12.0, 10.0, 300.0);
        let fused = fuse_today(&forecast(), Some(&b), None, DEFAULT_EXPOSURE_FACTOR);
        assert_eq!(fused.input.swell_direction_deg, 250.0);
    }

    #[test]
    fn test_tide_passthrough() {
        let tide = TideConditions {
            tide_height_ft: 2.4,
            tide_state: TideState::Falling,
        };
        let fused = fuse_forecast_day(&forecast(), Some(&tide), DEFAULT_EXPOSURE_FACTOR);
        assert_eq!(fused.input.tide_height_ft, Some(2.4));
        assert_eq!(fused.tide_state, Some(TideState::Falling));
    }

    #[test]
    fn test_exposure_factor_scales_face_height() {
        let fused = fuse_forecast_day(&forecast(), None, 0.5);
        assert!((fused.face_height_ft - 1.4).abs() < 1e-12);
        assert_eq!(fused.input.wave_height_ft, fused.face_height_ft);
    }
}
