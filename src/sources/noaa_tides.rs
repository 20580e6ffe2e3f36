//! # NOAA CO-OPS Tide Predictions
//!
//! Fetches tide predictions from the NOAA Tides & Currents data API and reduces
//! them to a single [`TideConditions`] per requested moment: the prediction
//! closest in time, with a [`TideState`] derived from its neighbours.
//!
//! ## Request Parameters
//! - **Product**: `predictions`, datum `MLLW`, `english` units (feet)
//! - **Time zone**: `lst_ldt`, local standard/daylight time of the station
//! - **Today**: 6-minute interval for the current reading
//! - **Forecast days**: hourly interval, one reading per day at local noon
//!
//! ## State Derivation
//! With `prev`, `cur`, `next` heights around the chosen prediction:
//! - `cur` above both neighbours: **high**
//! - `cur` below both neighbours: **low**
//! - `cur >= prev`: **rising**, otherwise **falling**
//!
//! The first prediction only has a successor (`cur <= next` is rising); a lone
//! prediction is reported as rising.

use super::{check_status, SourceError};
use crate::{TideConditions, TideState};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const BASE_URL: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

/// Minute of the day used to represent a forecast day (12:00 local)
pub const FORECAST_MINUTE_OF_DAY: i64 = 12 * 60;

/// One parsed prediction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    /// Station-local time
    pub time: NaiveDateTime,
    /// Height above MLLW in feet
    pub height_ft: f64,
}

impl Prediction {
    fn minute_of_day(&self) -> i64 {
        i64::from(self.time.hour()) * 60 + i64::from(self.time.minute())
    }
}

#[derive(Debug, Deserialize)]
struct TideResponse {
    #[serde(default)]
    predictions: Vec<RawPrediction>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    /// "2026-02-19 05:30"
    t: String,
    /// "3.456"
    v: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Current tide reading for a station, `None` on any failure.
pub async fn fetch_tide_conditions(
    client: &reqwest::Client,
    station_id: &str,
) -> Option<TideConditions> {
    let now = Local::now().naive_local();
    let today = now.date();

    let result = request_predictions(client, station_id, today, today, "6")
        .await
        .and_then(|predictions| {
            let minute = i64::from(now.hour()) * 60 + i64::from(now.minute());
            tide_at(&predictions, minute)
                .ok_or_else(|| SourceError::NoData(format!("no predictions for {today}")))
        });

    match result {
        Ok(tide) => {
            debug!(station = station_id, ?tide, "current tide");
            Some(tide)
        }
        Err(error) => {
            warn!(station = station_id, %error, "tide data unavailable");
            None
        }
    }
}

/// One tide reading per day for `days` days starting today, keyed by date.
pub async fn fetch_tide_forecast_days(
    client: &reqwest::Client,
    station_id: &str,
    days: u32,
) -> Option<BTreeMap<NaiveDate, TideConditions>> {
    let begin = Local::now().date_naive();
    let end = begin + Duration::days(i64::from(days.max(1)) - 1);

    match request_predictions(client, station_id, begin, end, "h").await {
        Ok(predictions) => {
            let by_day = forecast_by_day(&predictions);
            debug!(station = station_id, days = by_day.len(), "tide forecast");
            Some(by_day)
        }
        Err(error) => {
            warn!(station = station_id, %error, "tide forecast unavailable");
            None
        }
    }
}

async fn request_predictions(
    client: &reqwest::Client,
    station_id: &str,
    begin: NaiveDate,
    end: NaiveDate,
    interval: &str,
) -> Result<Vec<Prediction>, SourceError> {
    let begin_date = begin.format("%Y%m%d").to_string();
    let end_date = end.format("%Y%m%d").to_string();
    let query = [
        ("begin_date", begin_date.as_str()),
        ("end_date", end_date.as_str()),
        ("station", station_id),
        ("product", "predictions"),
        ("datum", "MLLW"),
        ("units", "english"),
        ("time_zone", "lst_ldt"),
        ("interval", interval),
        ("format", "json"),
    ];

    let response = client.get(BASE_URL).query(&query).send().await?;
    let body = check_status("NOAA Tides", response)?.text().await?;
    parse_predictions(&body)
}

/// Parse a datagetter JSON body into predictions, oldest first.
pub fn parse_predictions(body: &str) -> Result<Vec<Prediction>, SourceError> {
    let response: TideResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(SourceError::NoData(error.message));
    }
    if response.predictions.is_empty() {
        return Err(SourceError::NoData("empty predictions".to_string()));
    }

    response
        .predictions
        .iter()
        .map(|raw| {
            let time = NaiveDateTime::parse_from_str(raw.t.trim(), "%Y-%m-%d %H:%M")
                .map_err(|e| SourceError::Parse(format!("time {:?}: {e}", raw.t)))?;
            let height_ft = raw
                .v
                .trim()
                .parse()
                .map_err(|_| SourceError::Parse(format!("height {:?}", raw.v)))?;
            Ok(Prediction { time, height_ft })
        })
        .collect()
}

/// Reduce a run of predictions to the reading closest to `minute_of_day`.
///
/// Only the time of day is compared, so `predictions` should cover one day.
pub fn tide_at(predictions: &[Prediction], minute_of_day: i64) -> Option<TideConditions> {
    let mut closest: Option<(usize, i64)> = None;
    for (idx, prediction) in predictions.iter().enumerate() {
        let diff = (prediction.minute_of_day() - minute_of_day).abs();
        if closest.map_or(true, |(_, best)| diff < best) {
            closest = Some((idx, diff));
        }
    }
    let (idx, _) = closest?;

    let current = predictions[idx].height_ft;
    let prev = idx.checked_sub(1).and_then(|i| predictions.get(i));
    let next = predictions.get(idx + 1);

    let tide_state = match (prev, next) {
        (Some(prev), Some(next)) => {
            if current > prev.height_ft && current > next.height_ft {
                TideState::High
            } else if current < prev.height_ft && current < next.height_ft {
                TideState::Low
            } else if current >= prev.height_ft {
                TideState::Rising
            } else {
                TideState::Falling
            }
        }
        (None, Some(next)) if current <= next.height_ft => TideState::Rising,
        (None, Some(_)) => TideState::Falling,
        // Last of several, or a lone prediction
        _ => TideState::Rising,
    };

    Some(TideConditions {
        tide_height_ft: current,
        tide_state,
    })
}

/// Group predictions by date and take each day's reading at local noon.
pub fn forecast_by_day(predictions: &[Prediction]) -> BTreeMap<NaiveDate, TideConditions> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Prediction>> = BTreeMap::new();
    for prediction in predictions {
        by_day
            .entry(prediction.time.date())
            .or_default()
            .push(*prediction);
    }

    by_day
        .into_iter()
        .filter_map(|(date, day)| tide_at(&day, FORECAST_MINUTE_OF_DAY).map(|tide| (date, tide)))
        .collect()
}
