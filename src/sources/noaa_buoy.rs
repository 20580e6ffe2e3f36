//! NOAA NDBC real-time buoy observations.
//!
//! The `realtime2` feed is fixed-width text: a `#`-prefixed header row, a
//! units row, then observations newest first. Missing values are `MM`.
//!
//! ```text
//! #YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
//! #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
//! 2026 02 19 14 50 290  6.0  8.0   1.5    12   8.1 285 1016.2  13.1  14.2   8.9   MM   MM    MM
//! ```

use super::{check_status, SourceError};
use crate::units::{meters_to_feet, ms_to_mph};
use crate::BuoyObservation;
use chrono::{TimeZone, Utc};
use tracing::{debug, warn};

const BASE_URL: &str = "https://www.ndbc.noaa.gov/data/realtime2";

/// Marker NDBC uses for a missing value
const MISSING: &str = "MM";

/// Fetch the latest observation for a buoy station, `None` on any failure.
pub async fn fetch_buoy_data(
    client: &reqwest::Client,
    station_id: &str,
) -> Option<BuoyObservation> {
    match request_buoy_data(client, station_id).await {
        Ok(observation) => {
            debug!(station = station_id, ?observation, "buoy observation");
            Some(observation)
        }
        Err(error) => {
            warn!(station = station_id, %error, "buoy data unavailable");
            None
        }
    }
}

async fn request_buoy_data(
    client: &reqwest::Client,
    station_id: &str,
) -> Result<BuoyObservation, SourceError> {
    let url = format!("{BASE_URL}/{station_id}.txt");
    let response = check_status("NOAA NDBC", client.get(&url).send().await?)?;
    let text = response.text().await?;
    parse_realtime(&text)
}

/// Parse the newest row of an NDBC `realtime2` text file.
///
/// Missing wave height, period, wind speed or direction become `0.0`. If wave
/// height, period and wind speed are all missing the observation is useless
/// and [`SourceError::NoData`] is returned.
pub fn parse_realtime(text: &str) -> Result<BuoyObservation, SourceError> {
    let lines: Vec<&str> = text.trim().lines().collect();

    // Header + units + at least one data row
    let (header, row) = match lines.as_slice() {
        [header, _units, row, ..] => (*header, *row),
        _ => return Err(SourceError::Parse("insufficient buoy data".to_string())),
    };

    let headers: Vec<&str> = header.trim_start_matches('#').split_whitespace().collect();
    let values: Vec<&str> = row.split_whitespace().collect();

    let column = |name: &str| -> Option<f64> {
        let idx = headers.iter().position(|h| *h == name)?;
        let raw = values.get(idx)?;
        if *raw == MISSING {
            return None;
        }
        raw.parse().ok()
    };

    let wvht = column("WVHT");
    let dpd = column("DPD");
    let wspd = column("WSPD");
    let wdir = column("WDIR");

    if wvht.is_none() && dpd.is_none() && wspd.is_none() {
        return Err(SourceError::NoData(
            "wave height, period and wind speed all missing".to_string(),
        ));
    }

    let observed_at = match (
        column("YY"),
        column("MM"),
        column("DD"),
        column("hh"),
        column("mm"),
    ) {
        (Some(y), Some(mo), Some(d), Some(h), Some(mi)) => Utc
            .with_ymd_and_hms(y as i32, mo as u32, d as u32, h as u32, mi as u32, 0)
            .single(),
        _ => None,
    }
    .unwrap_or_else(Utc::now);

    Ok(BuoyObservation {
        wave_height_ft: meters_to_feet(wvht.unwrap_or(0.0)),
        dominant_period_s: dpd.unwrap_or(0.0),
        wind_speed_mph: ms_to_mph(wspd.unwrap_or(0.0)),
        wind_direction_deg: wdir.unwrap_or(0.0),
        observed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE\n\
                          #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft\n";

    fn feed(rows: &str) -> String {
        format!("{HEADER}{rows}")
    }

    #[test]
    fn test_parse_full_row() {
        let text = feed(
            "2026 02 19 14 50 290  6.0  8.0   1.5    12   8.1 285 1016.2  13.1  14.2   8.9   MM   MM    MM\n\
             2026 02 19 14 40 285  5.5  7.0   1.4    12   8.0 285 1016.3  13.1  14.2   8.9   MM   MM    MM\n",
        );
        let obs = parse_realtime(&text).unwrap();

        assert!((obs.wave_height_ft - 1.5 * 3.28084).abs() < 1e-9);
        assert_eq!(obs.dominant_period_s, 12.0);
        assert!((obs.wind_speed_mph - 6.0 * 2.23694).abs() < 1e-9);
        assert_eq!(obs.wind_direction_deg, 290.0);
        assert_eq!(
            obs.observed_at,
            Utc.with_ymd_and_hms(2026, 2, 19, 14, 50, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_columns_become_zero() {
        let text = feed(
            "2026 02 19 14 50  MM   MM   MM   1.2    10   7.0  MM 1016.2  13.1  14.2   8.9   MM   MM    MM\n",
        );
        let obs = parse_realtime(&text).unwrap();
        assert_eq!(obs.wind_speed_mph, 0.0);
        assert_eq!(obs.wind_direction_deg, 0.0);
        assert_eq!(obs.dominant_period_s, 10.0);
    }

    #[test]
    fn test_all_key_columns_missing_is_no_data() {
        let text = feed(
            "2026 02 19 14 50 290   MM   MM    MM    MM    MM  MM 1016.2  13.1  14.2   8.9   MM   MM    MM\n",
        );
        assert!(matches!(
            parse_realtime(&text),
            Err(SourceError::NoData(_))
        ));
    }

    #[test]
    fn test_too_few_lines() {
        assert!(matches!(parse_realtime(HEADER), Err(SourceError::Parse(_))));
        assert!(matches!(parse_realtime(""), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_bad_timestamp_falls_back_to_now() {
        let text = feed(
            "2026 13 19 14 50 290  6.0  8.0   1.5    12   8.1 285 1016.2  13.1  14.2   8.9   MM   MM    MM\n",
        );
        let before = Utc::now();
        let obs = parse_realtime(&text).unwrap();
        assert!(obs.observed_at >= before);
    }
}
