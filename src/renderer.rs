//! # Report Rendering
//!
//! Plain-text rendering of break reports for the terminal. Each break gets a
//! header, a "today" block with the fused readings behind the score, and one
//! bar-chart row per forecast day.
//!
//! ```text
//! Ocean Beach (ocean-beach-sf)  fetched 2026-02-19 13:00 UTC
//!   Today  Thu 19 Feb   78  Very Good  ███████████████▋
//!          face 3.5 ft (swell 5.0 ft)  14 s from W  wind 8 mph from E  tide 2.4 ft rising
//!   Fri 20 Feb   55  Good       ███████████
//! ```
//!
//! [`format_ranking`] renders the best-first table of every configured break.

use crate::geometry::normalize_bearing;
use crate::report::{BreakReport, ScoredConditions};
use crate::scoring::MAX_SCORE;
use crate::store::RankedBreak;
use std::fmt::Write;

/// Width of a full-score bar in characters
const BAR_WIDTH: usize = 20;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass name for a bearing.
pub fn compass_point(deg: f64) -> &'static str {
    let sector = (normalize_bearing(deg) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[sector]
}

/// Horizontal bar proportional to the score.
fn score_bar(score: u8) -> String {
    let filled = usize::from(score) * BAR_WIDTH / usize::from(MAX_SCORE);
    "█".repeat(filled)
}

fn day_line(scored: &ScoredConditions) -> String {
    format!(
        "{:>3}  {:<9}  {}",
        scored.score,
        scored.label.as_str(),
        score_bar(scored.score)
    )
}

fn details_line(scored: &ScoredConditions) -> String {
    let c = &scored.conditions;
    let input = &c.input;
    let tide = match (input.tide_height_ft, c.tide_state) {
        (Some(h), Some(state)) => format!("tide {h:.1} ft {}", state.as_str()),
        (Some(h), None) => format!("tide {h:.1} ft"),
        _ => "tide n/a".to_string(),
    };
    format!(
        "face {:.1} ft (swell {:.1} ft)  {:.0} s from {}  wind {:.0} mph from {}  {}",
        c.face_height_ft,
        c.swell_height_ft,
        input.swell_period_s,
        compass_point(input.swell_direction_deg),
        input.wind_speed_mph,
        compass_point(input.wind_direction_deg),
        tide
    )
}

/// Render one break report as text.
pub fn format_report(report: &BreakReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({})  fetched {}",
        report.break_name,
        report.break_id,
        report.fetched_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        out,
        "  Today  {}  {}",
        report.today.date.format("%a %d %b"),
        day_line(&report.today)
    );
    let _ = writeln!(out, "         {}", details_line(&report.today));
    for day in &report.forecast {
        let _ = writeln!(
            out,
            "         {}  {}",
            day.date.format("%a %d %b"),
            day_line(day)
        );
    }
    out
}

/// Render the ranking table, one row per break, best first.
pub fn format_ranking(ranked: &[RankedBreak<'_>]) -> String {
    let mut out = String::new();
    for (position, entry) in ranked.iter().enumerate() {
        let brk = entry.config;
        let _ = writeln!(
            out,
            "{:>2}. {:<22} {:<20} {:<5}  {:>3}  {:<9}  {}",
            position + 1,
            brk.name,
            brk.region,
            brk.break_type.as_str(),
            entry.score(),
            entry.label().as_str(),
            if entry.report.is_some() { "" } else { "(no data)" }
        );
    }
    out
}

/// Render reports to the terminal.
pub fn draw_ascii<'a>(reports: impl IntoIterator<Item = &'a BreakReport>) {
    let mut any = false;
    for report in reports {
        println!("{}", format_report(report));
        any = true;
    }
    if !any {
        println!("No reports yet. Run `surf-report refresh` first.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BreakConfig, BreakType, Config};
    use crate::fusion::fuse_today;
    use crate::{BreakInfo, MarineForecastDay, TideConditions, TideState};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn test_report() -> BreakReport {
        let info = BreakInfo {
            orientation_deg: 270.0,
            optimal_swell_dir_min: 260.0,
            optimal_swell_dir_max: 280.0,
            optimal_tide_low: 1.0,
            optimal_tide_high: 4.0,
        };
        let today = NaiveDate::from_ymd_opt(2026, 2, 19).unwrap();
        let day = MarineForecastDay {
            date: today,
            wave_height_ft: 5.5,
            swell_height_ft: 5.0,
            swell_period_s: 14.0,
            swell_direction_deg: 270.0,
            wind_wave_height_ft: 0.3,
            wind_speed_mph: 8.0,
            wind_direction_deg: 90.0,
        };
        let tide = TideConditions {
            tide_height_ft: 2.4,
            tide_state: TideState::Rising,
        };
        let tomorrow = MarineForecastDay {
            date: today.succ_opt().unwrap(),
            swell_period_s: 7.0,
            ..day.clone()
        };
        BreakReport {
            break_id: "ocean-beach-sf".to_string(),
            break_name: "Ocean Beach".to_string(),
            fetched_at: Utc.with_ymd_and_hms(2026, 2, 19, 13, 0, 0).unwrap(),
            today: ScoredConditions::score(
                &info,
                today,
                fuse_today(&day, None, Some(&tide), 0.7),
            ),
            forecast: vec![ScoredConditions::score(
                &info,
                tomorrow.date,
                fuse_today(&tomorrow, None, None, 0.7),
            )],
        }
    }

    #[test]
    fn test_format_ranking() {
        let report = test_report();
        let mut scored = Config::default().breaks.remove(0);
        scored.name = report.break_name.clone();
        let unscored = BreakConfig {
            id: "rincon".to_string(),
            name: "Rincon".to_string(),
            region: "Santa Barbara, CA".to_string(),
            break_type: BreakType::Point,
            ..scored.clone()
        };
        let ranked = [
            RankedBreak {
                config: &scored,
                report: Some(&report),
            },
            RankedBreak {
                config: &unscored,
                report: None,
            },
        ];

        let text = format_ranking(&ranked);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1. Ocean Beach"));
        assert!(lines[0].contains("San Francisco, CA"));
        assert!(lines[0].contains("beach"));
        assert!(lines[0].contains(report.today.label.as_str()));
        assert!(!lines[0].contains("(no data)"));
        assert!(lines[1].starts_with(" 2. Rincon"));
        assert!(lines[1].contains("point"));
        assert!(lines[1].contains("  0  Poor"));
        assert!(lines[1].ends_with("(no data)"));
    }

    #[test]
    fn test_compass_point() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(270.0), "W");
        assert_eq!(compass_point(292.5), "WNW");
        assert_eq!(compass_point(-90.0), "W");
    }

    #[test]
    fn test_score_bar_scales() {
        assert_eq!(score_bar(0), "");
        assert_eq!(score_bar(100).chars().count(), BAR_WIDTH);
        assert_eq!(score_bar(50).chars().count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_format_report() {
        let report = test_report();
        let text = format_report(&report);

        assert!(text.starts_with("Ocean Beach (ocean-beach-sf)  fetched 2026-02-19 13:00 UTC"));
        assert!(text.contains("Today  Thu 19 Feb"));
        assert!(text.contains(report.today.label.as_str()));
        assert!(text.contains("face 3.5 ft (swell 5.0 ft)"));
        assert!(text.contains("from W"));
        assert!(text.contains("wind 8 mph from E"));
        assert!(text.contains("tide 2.4 ft rising"));
        assert!(text.contains("Fri 20 Feb"));
        assert_eq!(text.lines().count(), 4);
    }
}
