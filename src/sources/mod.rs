//! # External Data Sources
//!
//! HTTP clients for the three feeds a break can draw on:
//!
//! - [`open_meteo`]: marine + wind forecast by coordinates (required)
//! - [`noaa_buoy`]: NDBC real-time buoy observations (optional, today only)
//! - [`noaa_tides`]: NOAA CO-OPS tide predictions (optional)
//!
//! Each client converts to feet/mph at this boundary. The public `fetch_*`
//! functions return `None` on any failure after logging it; callers only see
//! "reading" or "no reading". The inner request/parse steps return
//! [`SourceError`] so the reason reaches the log.

use std::time::Duration;
use thiserror::Error;

pub mod noaa_buoy;
pub mod noaa_tides;
pub mod open_meteo;

/// Errors that can occur while fetching or parsing a source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed (network, timeout, or body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status {status} from {source_name}")]
    Status {
        source_name: &'static str,
        status: reqwest::StatusCode,
    },

    /// Response body did not have the expected shape
    #[error("parse failed: {0}")]
    Parse(String),

    /// Response was well-formed but carried nothing usable
    #[error("no usable data: {0}")]
    NoData(String),
}

/// Build the shared HTTP client used by every source.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("surf-report/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Turn a non-2xx response into [`SourceError::Status`].
pub(crate) fn check_status(
    source_name: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SourceError::Status {
            source_name,
            status,
        })
    }
}
