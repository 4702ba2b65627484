//! hie-geo - HIE region checks and map grouping from the command line
//!
//! Module structure:
//! - `domain/` - Core types (Coordinate, EventPoint, rule tables)
//! - `services/` - Region classifier and location grouper
//! - `io/` - Event input and JSON/JSONL output
//! - `infra/` - Infrastructure (Config, Metrics)
//!
//! Usage:
//!   hie-geo postcode "PH22 1RH" "EH1 1YZ"
//!   hie-geo coordinate 57.5 -5.0
//!   hie-geo --config config/default.toml group --input events.json --format jsonl

use clap::{Parser, Subcommand};
use hie_geo::infra::{Config, Metrics};
use hie_geo::io::{read_events, CoordinateReport, OutputFormat, PostcodeReport, ReportWriter};
use hie_geo::services::{LocationGrouper, RegionClassifier};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// hie-geo - Highlands & Islands region checks and event grouping
#[derive(Parser, Debug)]
#[command(name = "hie-geo", version, about, long_about = None)]
struct Args {
    /// Path to TOML configuration file
    ///
    /// Falls back to $HIE_GEO_CONFIG, then config/default.toml. Missing or
    /// invalid files log a warning and use built-in defaults.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output layout: "json" (array) or "jsonl" (one record per line)
    #[arg(short, long, global = true, default_value = "jsonl")]
    format: OutputFormat,

    /// Emit logs as JSON objects instead of text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether postcodes fall inside the HIE region
    Postcode {
        /// One or more postcodes, any casing/spacing
        #[arg(required = true)]
        postcodes: Vec<String>,
    },
    /// Check a latitude/longitude against the HIE bounding box
    Coordinate {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Group events into one marker per rounded position
    Group {
        /// Events file (JSON array or JSONL), "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Override the configured rounding precision
        #[arg(short, long)]
        precision: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    // Default: INFO, use RUST_LOG=debug for per-check visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(io::stderr);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config_path = Config::resolve_config_path(args.config.as_deref());
    let config = Config::load_from_path(&config_path);

    info!(
        version = %env!("CARGO_PKG_VERSION"),
        git_hash = %env!("GIT_HASH"),
        config_file = %config.config_file(),
        rule_set = %config.rule_set().name,
        rule_set_version = %config.rule_set().version,
        grouping_precision = %config.grouping_precision(),
        "config_loaded"
    );

    let metrics = Arc::new(Metrics::new());
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock(), args.format);

    match args.command {
        Command::Postcode { postcodes } => {
            let classifier = RegionClassifier::from_config(&config).with_metrics(metrics.clone());
            let classifications: Vec<_> =
                postcodes.iter().map(|postcode| classifier.classify(postcode)).collect();
            let reports: Vec<PostcodeReport<'_>> = postcodes
                .iter()
                .zip(&classifications)
                .map(|(postcode, c)| PostcodeReport::new(postcode, c, classifier.rule_set()))
                .collect();
            writer.write_records(&reports)?;
        }
        Command::Coordinate { latitude, longitude } => {
            let classifier = RegionClassifier::from_config(&config).with_metrics(metrics.clone());
            let in_region = classifier.is_in_region_by_coordinate(latitude, longitude);
            writer.write_records(&[CoordinateReport { latitude, longitude, in_region }])?;
        }
        Command::Group { input, precision } => {
            let events = read_events(&input)?;
            let grouper = match precision {
                Some(p) => LocationGrouper::with_precision(p),
                None => LocationGrouper::from_config(&config),
            }
            .with_metrics(metrics.clone());

            let groups = grouper.group(events);
            info!(groups = %groups.len(), precision = %grouper.precision(), "grouping_complete");
            writer.write_records(&groups)?;
        }
    }

    writer.into_inner().flush()?;

    if config.report_metrics_on_exit() {
        metrics.report().log();
    }

    Ok(())
}
