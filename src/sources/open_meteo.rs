//! # Open-Meteo Marine & Wind Forecast
//!
//! The marine API supplies wave and swell fields, the regular forecast API
//! supplies 10 m wind. Both are requested hourly for the same coordinates and
//! `timezone=auto`, so their `time` arrays are in the break's local time and
//! line up entry for entry.
//!
//! Two views are built from one pair of responses:
//! - **current**: the entry for the break-local current hour (today's score)
//! - **days**: one entry per date at 12:00 local, or the first hour present
//!
//! Heights arrive in meters and wind in km/h; both are converted here. Null
//! entries become `0.0`.

use super::{check_status, SourceError};
use crate::units::{kmh_to_mph, meters_to_feet};
use crate::MarineForecastDay;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error};

const MARINE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const MARINE_FIELDS: &str = "wave_height,wave_period,wave_direction,swell_wave_height,swell_wave_period,swell_wave_direction,wind_wave_height";
const WIND_FIELDS: &str = "wind_speed_10m,wind_direction_10m";

/// Open-Meteo serves at most 16 forecast days
pub const MAX_FORECAST_DAYS: u32 = 16;

/// Hour of the day used to represent a forecast day
const REPRESENTATIVE_HOUR: &str = "T12:00";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
pub struct MarineResponse {
    #[serde(default)]
    pub utc_offset_seconds: i64,
    pub hourly: MarineHourly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarineHourly {
    pub time: Vec<String>,
    pub wave_height: Vec<Option<f64>>,
    pub swell_wave_height: Vec<Option<f64>>,
    pub swell_wave_period: Vec<Option<f64>>,
    pub swell_wave_direction: Vec<Option<f64>>,
    pub wind_wave_height: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct WindResponse {
    pub hourly: WindHourly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WindHourly {
    pub time: Vec<String>,
    pub wind_speed_10m: Vec<Option<f64>>,
    pub wind_direction_10m: Vec<Option<f64>>,
}

/// Forecast for one set of coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct MarineForecast {
    /// Conditions for the current hour, `None` if the hour is not in the response
    pub current: Option<MarineForecastDay>,
    /// One entry per date, today first
    pub days: Vec<MarineForecastDay>,
}

/// Days actually requested for a configured `forecast_days`, 1 to 16.
pub fn forecast_day_count(requested: u32) -> u32 {
    requested.clamp(1, MAX_FORECAST_DAYS)
}

/// Fetch `days` days of marine + wind forecast, `None` on any failure.
pub async fn fetch_marine_forecast(
    client: &reqwest::Client,
    latitude: f64,
    longitude: f64,
    days: u32,
) -> Option<MarineForecast> {
    let days = forecast_day_count(days);
    match request_forecast(client, latitude, longitude, days).await {
        Ok((marine, wind)) => {
            let forecast = MarineForecast {
                current: current_conditions(&marine, &wind, Utc::now()),
                days: daily_forecast(&marine, &wind, days as usize),
            };
            debug!(latitude, longitude, days = forecast.days.len(), "marine forecast");
            Some(forecast)
        }
        Err(err) => {
            error!(latitude, longitude, error = %err, "Open-Meteo fetch failed");
            None
        }
    }
}

async fn request_forecast(
    client: &reqwest::Client,
    latitude: f64,
    longitude: f64,
    days: u32,
) -> Result<(MarineResponse, WindResponse), SourceError> {
    let days = days.to_string();
    let lat = latitude.to_string();
    let lon = longitude.to_string();

    let marine_query = [
        ("latitude", lat.as_str()),
        ("longitude", lon.as_str()),
        ("hourly", MARINE_FIELDS),
        ("timezone", "auto"),
        ("forecast_days", days.as_str()),
    ];
    let wind_query = [
        ("latitude", lat.as_str()),
        ("longitude", lon.as_str()),
        ("hourly", WIND_FIELDS),
        ("timezone", "auto"),
        ("forecast_days", days.as_str()),
    ];

    // Both requests in flight together
    let (marine, wind) = tokio::try_join!(
        async {
            let response = client.get(MARINE_URL).query(&marine_query).send().await?;
            let marine: MarineResponse =
                check_status("Open-Meteo marine", response)?.json().await?;
            Ok::<_, SourceError>(marine)
        },
        async {
            let response = client.get(FORECAST_URL).query(&wind_query).send().await?;
            let wind: WindResponse = check_status("Open-Meteo forecast", response)?
                .json()
                .await?;
            Ok::<_, SourceError>(wind)
        },
    )?;

    if marine.hourly.time.is_empty() {
        return Err(SourceError::NoData("marine response has no hours".to_string()));
    }
    Ok((marine, wind))
}

/// Conditions for the break-local hour containing `now`.
pub fn current_conditions(
    marine: &MarineResponse,
    wind: &WindResponse,
    now: DateTime<Utc>,
) -> Option<MarineForecastDay> {
    let local = now.naive_utc() + Duration::seconds(marine.utc_offset_seconds);
    let hour_prefix = local.format("%Y-%m-%dT%H").to_string();

    let idx = marine
        .hourly
        .time
        .iter()
        .position(|t| t.starts_with(&hour_prefix))?;
    build_day(marine, wind, idx)
}

/// One [`MarineForecastDay`] per date, in response order, at most `days` long.
pub fn daily_forecast(
    marine: &MarineResponse,
    wind: &WindResponse,
    days: usize,
) -> Vec<MarineForecastDay> {
    let mut dates: Vec<&str> = Vec::new();
    for time in &marine.hourly.time {
        let date = date_part(time);
        if dates.last() != Some(&date) {
            dates.push(date);
        }
    }

    dates
        .into_iter()
        .take(days)
        .filter_map(|date| {
            let noon = format!("{date}{REPRESENTATIVE_HOUR}");
            let times = &marine.hourly.time;
            let idx = times
                .iter()
                .position(|t| *t == noon)
                .or_else(|| times.iter().position(|t| date_part(t) == date))?;
            build_day(marine, wind, idx)
        })
        .collect()
}

fn date_part(time: &str) -> &str {
    time.split('T').next().unwrap_or(time)
}

fn value_at(series: &[Option<f64>], idx: usize) -> f64 {
    series.get(idx).copied().flatten().unwrap_or(0.0)
}

fn build_day(marine: &MarineResponse, wind: &WindResponse, idx: usize) -> Option<MarineForecastDay> {
    let time = marine.hourly.time.get(idx)?;
    let date = match NaiveDateTime::parse_from_str(time, TIME_FORMAT) {
        Ok(dt) => dt.date(),
        Err(_) => NaiveDate::parse_from_str(date_part(time), "%Y-%m-%d").ok()?,
    };

    // Same timestamp in the wind series, else first entry
    let wind_idx = wind
        .hourly
        .time
        .iter()
        .position(|t| t == time)
        .unwrap_or(0);

    let hourly = &marine.hourly;
    Some(MarineForecastDay {
        date,
        wave_height_ft: meters_to_feet(value_at(&hourly.wave_height, idx)),
        swell_height_ft: meters_to_feet(value_at(&hourly.swell_wave_height, idx)),
        swell_period_s: value_at(&hourly.swell_wave_period, idx),
        swell_direction_deg: value_at(&hourly.swell_wave_direction, idx),
        wind_wave_height_ft: meters_to_feet(value_at(&hourly.wind_wave_height, idx)),
        wind_speed_mph: kmh_to_mph(value_at(&wind.hourly.wind_speed_10m, wind_idx)),
        wind_direction_deg: value_at(&wind.hourly.wind_direction_10m, wind_idx),
    })
}
