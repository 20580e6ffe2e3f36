//! # Break Reports
//!
//! Orchestrates one refresh: fetch every source for a break, fuse, score today
//! and each later forecast day.
//!
//! ## Source Policy
//! - **Marine forecast**: required. Without it the break is skipped and counted
//!   as an error.
//! - **Buoy**: optional, today only. Absence falls back to forecast values.
//! - **Tide**: optional. Absence leaves the tide sub-score at zero.
//!
//! ## Batching
//! Breaks are refreshed in batches of `batch_size`; the breaks inside a batch
//! run concurrently, batches run one after another so the upstream APIs see at
//! most `batch_size` breaks' worth of requests at a time.

use crate::config::{BreakConfig, FetchSettings};
use crate::fusion::{fuse_forecast_day, fuse_today, FusedConditions};
use crate::scoring::{quality_label, score_breakdown, QualityLabel, ScoreBreakdown};
use crate::sources::open_meteo::{fetch_marine_forecast, MarineForecast};
use crate::sources::{http_client, noaa_buoy, noaa_tides, SourceError};
use crate::{BreakInfo, BuoyObservation, TideConditions};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Errors that stop a break from being scored.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The required marine forecast could not be fetched
    #[error("no marine data for {break_id}")]
    NoMarineData { break_id: String },
}

/// One scored day at a break.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredConditions {
    pub date: NaiveDate,
    pub conditions: FusedConditions,
    pub breakdown: ScoreBreakdown,
    pub score: u8,
    pub label: QualityLabel,
}

impl ScoredConditions {
    /// Score fused conditions against a break's reference data.
    pub fn score(info: &BreakInfo, date: NaiveDate, conditions: FusedConditions) -> Self {
        let breakdown = score_breakdown(info, &conditions.input);
        let score = breakdown.total();
        ScoredConditions {
            date,
            conditions,
            breakdown,
            score,
            label: quality_label(score),
        }
    }
}

/// Latest conditions and forecast for one break.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakReport {
    pub break_id: String,
    pub break_name: String,
    pub fetched_at: DateTime<Utc>,
    pub today: ScoredConditions,
    /// Days after today, in date order
    pub forecast: Vec<ScoredConditions>,
}

/// Outcome counts for a refresh run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub processed: usize,
    pub errors: usize,
    pub elapsed_seconds: f64,
}

/// Fuse and score already-fetched data for one break.
///
/// Today's score uses the current-hour forecast when present, otherwise the
/// first forecast day, with the buoy and today's tide layered on top. Every
/// other day is scored from the forecast and that day's tide reading only.
pub fn build_report(
    brk: &BreakConfig,
    forecast: &MarineForecast,
    buoy: Option<&BuoyObservation>,
    today_tide: Option<&TideConditions>,
    tide_forecast: Option<&BTreeMap<NaiveDate, TideConditions>>,
    fetched_at: DateTime<Utc>,
) -> Result<BreakReport, ReportError> {
    let first_day = forecast
        .days
        .first()
        .ok_or_else(|| ReportError::NoMarineData {
            break_id: brk.id.clone(),
        })?;
    let today_date = first_day.date;
    let info = brk.info();

    let today_base = forecast.current.as_ref().unwrap_or(first_day);
    let today = ScoredConditions::score(
        &info,
        today_date,
        fuse_today(today_base, buoy, today_tide, brk.exposure()),
    );

    let later_days = forecast
        .days
        .iter()
        .filter(|day| day.date != today_date)
        .map(|day| {
            let tide = tide_forecast.and_then(|by_day| by_day.get(&day.date));
            ScoredConditions::score(
                &info,
                day.date,
                fuse_forecast_day(day, tide, brk.exposure()),
            )
        })
        .collect();

    Ok(BreakReport {
        break_id: brk.id.clone(),
        break_name: brk.name.clone(),
        fetched_at,
        today,
        forecast: later_days,
    })
}

/// Fetch every source for one break and build its report.
pub async fn refresh_break(
    client: &reqwest::Client,
    brk: &BreakConfig,
    settings: &FetchSettings,
) -> Result<BreakReport, ReportError> {
    let forecast = fetch_marine_forecast(
        client,
        brk.latitude,
        brk.longitude,
        settings.forecast_days,
    )
    .await
    .ok_or_else(|| ReportError::NoMarineData {
        break_id: brk.id.clone(),
    })?;

    // Best effort enrichments
    let (buoy, today_tide, tide_forecast) = tokio::join!(
        async {
            match &brk.nearest_buoy_station {
                Some(station) => noaa_buoy::fetch_buoy_data(client, station).await,
                None => None,
            }
        },
        async {
            match &brk.nearest_tide_station {
                Some(station) => noaa_tides::fetch_tide_conditions(client, station).await,
                None => None,
            }
        },
        async {
            match &brk.nearest_tide_station {
                Some(station) => {
                    noaa_tides::fetch_tide_forecast_days(client, station, settings.forecast_days)
                        .await
                }
                None => None,
            }
        },
    );

    build_report(
        brk,
        &forecast,
        buoy.as_ref(),
        today_tide.as_ref(),
        tide_forecast.as_ref(),
        Utc::now(),
    )
}

/// Refresh every break, `batch_size` at a time.
///
/// Reports come back in configuration order. A break that fails is logged and
/// counted in [`RefreshSummary::errors`]; it never aborts the run.
pub async fn refresh_all(
    breaks: &[BreakConfig],
    settings: &FetchSettings,
) -> Result<(Vec<BreakReport>, RefreshSummary), SourceError> {
    let client = http_client(Duration::from_secs(settings.request_timeout_secs))?;

    info!(breaks = breaks.len(), "fetching conditions");

    let outcome = refresh_batched(breaks, settings.batch_size, |brk| {
        let client = client.clone();
        let settings = settings.clone();
        async move { refresh_break(&client, &brk, &settings).await }
    })
    .await;
    Ok(outcome)
}

/// Run `fetch` for every break in batches of `batch_size`.
///
/// Breaks inside a batch run concurrently on their own tasks; the next batch
/// starts once the whole batch has finished.
pub async fn refresh_batched<F, Fut>(
    breaks: &[BreakConfig],
    batch_size: usize,
    fetch: F,
) -> (Vec<BreakReport>, RefreshSummary)
where
    F: Fn(BreakConfig) -> Fut,
    Fut: Future<Output = Result<BreakReport, ReportError>> + Send + 'static,
{
    let started = Instant::now();
    let mut reports: Vec<(usize, BreakReport)> = Vec::with_capacity(breaks.len());
    let mut errors = 0;

    let batch_size = batch_size.max(1);
    for (batch_idx, batch) in breaks.chunks(batch_size).enumerate() {
        let mut tasks = JoinSet::new();
        for (offset, brk) in batch.iter().enumerate() {
            let position = batch_idx * batch_size + offset;
            let name = brk.name.clone();
            let pending = fetch(brk.clone());
            tasks.spawn(async move { (position, name, pending.await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, _, Ok(report))) => reports.push((position, report)),
                Ok((_, name, Err(err))) => {
                    error!(break_name = %name, error = %err, "break refresh failed");
                    errors += 1;
                }
                Err(join_error) => {
                    error!(error = %join_error, "break refresh task panicked");
                    errors += 1;
                }
            }
        }
    }

    reports.sort_by_key(|(position, _)| *position);
    let summary = RefreshSummary {
        processed: reports.len(),
        errors,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    };

    info!(
        processed = summary.processed,
        errors = summary.errors,
        elapsed_seconds = summary.elapsed_seconds,
        "fetch conditions complete"
    );

    (reports.into_iter().map(|(_, report)| report).collect(), summary)
}
