//! # Surf Report Application Entry Point
//!
//! This binary crate wires configuration, fetching, scoring, storage and
//! rendering together behind a small command line.
//!
//! # Usage
//!
//! ```bash
//! # Fetch and score every configured break, save and print the reports
//! surf-report refresh
//!
//! # Refresh one break only
//! surf-report refresh --break ocean-beach-sf
//!
//! # Rank every configured break best-first, then print the saved reports,
//! # without touching the network
//! surf-report show
//!
//! # Score hand-entered conditions for a configured break
//! surf-report score --break ocean-beach-sf --face-ft 4 --period 14 \
//!     --swell-dir 270 --wind-mph 12 --wind-dir 90 --tide-ft 2.5
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter directives, e.g. `surf_report_lib=debug` (default: info for this
//!   crate, warn for dependencies)

#[cfg(test)]
mod tests;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use surf_report_lib::config::{Config, CONFIG_FILE};
use surf_report_lib::renderer::{draw_ascii, format_ranking};
use surf_report_lib::report::refresh_all;
use surf_report_lib::scoring::{quality_label, score_breakdown};
use surf_report_lib::store::ReportStore;
use surf_report_lib::ConditionsInput;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str = "surf_report=info,surf_report_lib=info,warn";

#[derive(Parser)]
#[command(name = "surf-report")]
#[command(about = "Surf quality scores from forecast, buoy and tide data", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch conditions, score, save and print reports
    Refresh {
        /// Only refresh this break id
        #[arg(long = "break")]
        break_id: Option<String>,
    },

    /// Rank configured breaks by today's score and print saved reports
    Show {
        /// Only show this break id
        #[arg(long = "break")]
        break_id: Option<String>,
    },

    /// Score manually entered conditions for a configured break
    Score {
        #[arg(long = "break")]
        break_id: String,
        /// Estimated face height in feet
        #[arg(long)]
        face_ft: f64,
        /// Swell period in seconds
        #[arg(long)]
        period: f64,
        /// Swell direction in degrees
        #[arg(long)]
        swell_dir: f64,
        /// Wind speed in mph
        #[arg(long)]
        wind_mph: f64,
        /// Direction the wind blows from, in degrees
        #[arg(long)]
        wind_dir: f64,
        /// Tide height in feet
        #[arg(long)]
        tide_ft: Option<f64>,
    },

    /// Write the default configuration file
    InitConfig,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitConfig => {
            if cli.config.exists() {
                return Err(anyhow!("{} already exists", cli.config.display()));
            }
            Config::default().save(&cli.config)?;
        }

        Commands::Refresh { break_id } => {
            let config = Config::load_from_path(&cli.config);
            let breaks = match &break_id {
                Some(id) => vec![config
                    .find_break(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("unknown break {id}"))?],
                None => config.breaks.clone(),
            };

            // Create Tokio runtime for async operations
            let rt = tokio::runtime::Runtime::new()?;
            let (reports, summary) = rt.block_on(refresh_all(&breaks, &config.fetch))?;

            let mut store = ReportStore::open(&config.fetch.report_path)
                .with_context(|| format!("open {}", config.fetch.report_path.display()))?;
            for report in &reports {
                store.replace(report.clone());
            }
            store.save()?;
            info!(
                processed = summary.processed,
                errors = summary.errors,
                path = %config.fetch.report_path.display(),
                "reports saved"
            );

            draw_ascii(&reports);
        }

        Commands::Show { break_id } => {
            let config = Config::load_from_path(&cli.config);
            let store = ReportStore::open(&config.fetch.report_path)
                .with_context(|| format!("open {}", config.fetch.report_path.display()))?;
            match break_id {
                Some(id) => draw_ascii(store.get(&id)),
                None => {
                    let ranked = store.ranked(&config.breaks);
                    print!("{}", format_ranking(&ranked));
                    println!();
                    draw_ascii(ranked.iter().filter_map(|entry| entry.report));
                }
            }
        }

        Commands::Score {
            break_id,
            face_ft,
            period,
            swell_dir,
            wind_mph,
            wind_dir,
            tide_ft,
        } => {
            let config = Config::load_from_path(&cli.config);
            let brk = config
                .find_break(&break_id)
                .ok_or_else(|| anyhow!("unknown break {break_id}"))?;

            let conditions = ConditionsInput {
                wave_height_ft: face_ft,
                swell_period_s: period,
                swell_direction_deg: swell_dir,
                wind_speed_mph: wind_mph,
                wind_direction_deg: wind_dir,
                tide_height_ft: tide_ft,
            };
            let breakdown = score_breakdown(&brk.info(), &conditions);
            let score = breakdown.total();

            println!("{} ({})", brk.name, brk.id);
            println!("  wave height     {:>3} / 20", breakdown.wave_height);
            println!("  swell period    {:>3} / 30", breakdown.swell_period);
            println!("  wind            {:>3} / 25", breakdown.wind);
            println!("  swell direction {:>3} / 15", breakdown.swell_direction);
            println!("  tide            {:>3} / 10", breakdown.tide);
            println!("  total           {:>3}  {}", score, quality_label(score));
        }
    }

    Ok(())
}
