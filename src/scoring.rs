//! # Surf Quality Scoring
//!
//! Maps a break's reference data and one day's fused conditions to an integer
//! score in [0, 100], and a score to a [`QualityLabel`].
//!
//! ## Point Allocation
//!
//! | Factor          | Max | Rule |
//! |-----------------|-----|------|
//! | Face height     | 20  | best at 3–5 ft, tapering either side |
//! | Swell period    | 30  | longer is better, 13 s and up scores full |
//! | Wind            | 25  | offshore 25, calm (< 5 mph) 20, cross-offshore 10 |
//! | Swell direction | 15  | inside the window 15, within 30° of an edge 10 |
//! | Tide            | 10  | inside the optimal tide range |
//!
//! Every band table is evaluated first-match-wins; no match scores 0. The
//! engine is total: it never fails and has no side effects.

use crate::geometry::{angle_diff, is_in_range, is_within_30_degrees};
use crate::{BreakInfo, ConditionsInput};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Bound, RangeBounds};

/// Maximum total score
pub const MAX_SCORE: u8 = 100;

type HeightBand = ((Bound<f64>, Bound<f64>), u8);

/// Face height bands in feet
const WAVE_HEIGHT_BANDS: [HeightBand; 5] = [
    ((Bound::Included(3.0), Bound::Included(5.0)), 20),
    ((Bound::Included(2.0), Bound::Excluded(3.0)), 15),
    ((Bound::Excluded(5.0), Bound::Included(8.0)), 15),
    ((Bound::Included(1.0), Bound::Excluded(2.0)), 10),
    ((Bound::Excluded(8.0), Bound::Unbounded), 5),
];

/// Minimum swell period in seconds for each point level, descending
const SWELL_PERIOD_BANDS: [(f64, u8); 4] = [(13.0, 30), (10.0, 25), (8.0, 15), (6.0, 5)];

/// Wind angles are measured between where the wind blows from and where the break faces
const OFFSHORE_MIN_ANGLE: f64 = 150.0;
const CROSS_OFFSHORE_MIN_ANGLE: f64 = 120.0;
const CALM_WIND_MPH: f64 = 5.0;

const WIND_OFFSHORE_POINTS: u8 = 25;
const WIND_CALM_POINTS: u8 = 20;
const WIND_CROSS_OFFSHORE_POINTS: u8 = 10;

const SWELL_DIR_IN_WINDOW_POINTS: u8 = 15;
const SWELL_DIR_NEAR_MISS_POINTS: u8 = 10;

const TIDE_POINTS: u8 = 10;

/// Minimum score for each label, descending
const LABEL_BANDS: [(u8, QualityLabel); 4] = [
    (81, QualityLabel::Epic),
    (61, QualityLabel::VeryGood),
    (41, QualityLabel::Good),
    (21, QualityLabel::Fair),
];

/// Human-readable surf quality, a step function of the score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityLabel {
    Epic,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl QualityLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityLabel::Epic => "Epic",
            QualityLabel::VeryGood => "Very Good",
            QualityLabel::Good => "Good",
            QualityLabel::Fair => "Fair",
            QualityLabel::Poor => "Poor",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded per factor for one scoring call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub wave_height: u8,
    pub swell_period: u8,
    pub wind: u8,
    pub swell_direction: u8,
    pub tide: u8,
}

impl ScoreBreakdown {
    /// Sum of all factors, clamped to [`MAX_SCORE`].
    pub fn total(&self) -> u8 {
        let sum: u16 = [
            self.wave_height,
            self.swell_period,
            self.wind,
            self.swell_direction,
            self.tide,
        ]
        .into_iter()
        .map(u16::from)
        .sum();
        sum.min(u16::from(MAX_SCORE)) as u8
    }
}

/// Score one day of conditions at a break.
///
/// # Example
/// ```
/// use surf_report_lib::scoring::{calculate_score, quality_label, QualityLabel};
/// use surf_report_lib::{BreakInfo, ConditionsInput};
///
/// let info = BreakInfo {
///     orientation_deg: 270.0,
///     optimal_swell_dir_min: 260.0,
///     optimal_swell_dir_max: 280.0,
///     optimal_tide_low: 1.0,
///     optimal_tide_high: 4.0,
/// };
/// let conditions = ConditionsInput {
///     wave_height_ft: 4.0,
///     swell_period_s: 14.0,
///     swell_direction_deg: 270.0,
///     wind_speed_mph: 12.0,
///     wind_direction_deg: 90.0,
///     tide_height_ft: Some(2.5),
/// };
///
/// let score = calculate_score(&info, &conditions);
/// assert_eq!(score, 100);
/// assert_eq!(quality_label(score), QualityLabel::Epic);
/// ```
pub fn calculate_score(info: &BreakInfo, conditions: &ConditionsInput) -> u8 {
    score_breakdown(info, conditions).total()
}

/// Compute each factor's points without summing them.
pub fn score_breakdown(info: &BreakInfo, conditions: &ConditionsInput) -> ScoreBreakdown {
    ScoreBreakdown {
        wave_height: wave_height_points(conditions.wave_height_ft),
        swell_period: swell_period_points(conditions.swell_period_s),
        wind: wind_points(
            info.orientation_deg,
            conditions.wind_direction_deg,
            conditions.wind_speed_mph,
        ),
        swell_direction: swell_direction_points(info, conditions.swell_direction_deg),
        tide: tide_points(info, conditions.tide_height_ft),
    }
}

/// Label for a score; every value in 0..=100 maps to exactly one label.
pub fn quality_label(score: u8) -> QualityLabel {
    LABEL_BANDS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|&(_, label)| label)
        .unwrap_or(QualityLabel::Poor)
}

fn wave_height_points(face_ft: f64) -> u8 {
    WAVE_HEIGHT_BANDS
        .iter()
        .find(|(range, _)| range.contains(&face_ft))
        .map_or(0, |&(_, points)| points)
}

fn swell_period_points(period_s: f64) -> u8 {
    SWELL_PERIOD_BANDS
        .iter()
        .find(|(min, _)| period_s >= *min)
        .map_or(0, |&(_, points)| points)
}

fn wind_points(orientation_deg: f64, wind_from_deg: f64, speed_mph: f64) -> u8 {
    let angle = angle_diff(wind_from_deg, orientation_deg);

    // Calm beats direction, but only once the offshore check has failed
    if angle >= OFFSHORE_MIN_ANGLE {
        WIND_OFFSHORE_POINTS
    } else if speed_mph < CALM_WIND_MPH {
        WIND_CALM_POINTS
    } else if angle >= CROSS_OFFSHORE_MIN_ANGLE {
        WIND_CROSS_OFFSHORE_POINTS
    } else {
        0
    }
}

fn swell_direction_points(info: &BreakInfo, swell_dir_deg: f64) -> u8 {
    let (min, max) = (info.optimal_swell_dir_min, info.optimal_swell_dir_max);
    if is_in_range(swell_dir_deg, min, max) {
        SWELL_DIR_IN_WINDOW_POINTS
    } else if is_within_30_degrees(swell_dir_deg, min, max) {
        SWELL_DIR_NEAR_MISS_POINTS
    } else {
        0
    }
}

fn tide_points(info: &BreakInfo, tide_ft: Option<f64>) -> u8 {
    match tide_ft {
        Some(h) if (info.optimal_tide_low..=info.optimal_tide_high).contains(&h) => TIDE_POINTS,
        _ => 0,
    }
}
