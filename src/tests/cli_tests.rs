//! # Command Line Test Suite
//!
//! Argument parsing and the default log filter.

use crate::{Cli, Commands, DEFAULT_LOG_FILTER};
use clap::Parser;
use surf_report_lib::config::CONFIG_FILE;
use tracing_subscriber::EnvFilter;

#[test]
fn default_log_filter_parses() {
    assert!(DEFAULT_LOG_FILTER.parse::<EnvFilter>().is_ok());
    // Per-crate directives are accepted in RUST_LOG
    assert!(EnvFilter::try_new("surf_report_lib=debug,warn").is_ok());
}

#[test]
fn show_defaults_to_ranked_view() {
    let cli = Cli::try_parse_from(["surf-report", "show"]).unwrap();
    assert_eq!(cli.config.to_str(), Some(CONFIG_FILE));
    assert!(matches!(cli.command, Commands::Show { break_id: None }));
}

#[test]
fn score_takes_optional_tide() {
    let cli = Cli::try_parse_from([
        "surf-report",
        "score",
        "--break",
        "ocean-beach-sf",
        "--face-ft",
        "4",
        "--period",
        "14",
        "--swell-dir",
        "270",
        "--wind-mph",
        "12",
        "--wind-dir",
        "90",
    ])
    .unwrap();
    match cli.command {
        Commands::Score {
            break_id, tide_ft, ..
        } => {
            assert_eq!(break_id, "ocean-beach-sf");
            assert_eq!(tide_ft, None);
        }
        _ => panic!("expected score command"),
    }
}

#[test]
fn refresh_rejects_unknown_flag() {
    assert!(Cli::try_parse_from(["surf-report", "refresh", "--days", "3"]).is_err());
}
