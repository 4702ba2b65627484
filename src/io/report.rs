//! Result output for the CLI
//!
//! Records are written either as one pretty JSON array or as JSONL (one
//! JSON object per line). Every record carries a `generated_at` timestamp.

use crate::domain::postcode::ParsedOutwardCode;
use crate::domain::rules::RegionRuleSet;
use crate::services::region_classifier::{Classification, Verdict};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            other => Err(format!("unknown output format '{}' (expected json or jsonl)", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Jsonl => f.write_str("jsonl"),
        }
    }
}

/// Postcode check result as printed by the CLI
#[derive(Debug, Serialize)]
pub struct PostcodeReport<'a> {
    pub postcode: &'a str,
    pub outward_code: Option<String>,
    pub in_region: bool,
    pub reason: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub rule_set: &'static str,
    pub rule_set_version: u32,
}

impl<'a> PostcodeReport<'a> {
    pub fn new(
        postcode: &'a str,
        classification: &Classification,
        rule_set: &'static RegionRuleSet,
    ) -> Self {
        Self {
            postcode,
            outward_code: classification.outward.as_ref().map(ParsedOutwardCode::to_string),
            in_region: classification.in_region(),
            reason: classification.verdict,
            message: classification.verdict.rejection_message(),
            rule_set: rule_set.name,
            rule_set_version: rule_set.version,
        }
    }
}

/// Bounding-box check result as printed by the CLI
#[derive(Debug, Serialize)]
pub struct CoordinateReport {
    pub latitude: f64,
    pub longitude: f64,
    pub in_region: bool,
}

#[derive(Serialize)]
struct Stamped<'a, T> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    record: &'a T,
}

/// Serialises records to any writer (stdout in the CLI)
pub struct ReportWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    /// Write a batch of records and flush
    pub fn write_records<T: Serialize>(&mut self, records: &[T]) -> anyhow::Result<()> {
        let generated_at = Utc::now();

        match self.format {
            OutputFormat::Jsonl => {
                for record in records {
                    serde_json::to_writer(&mut self.writer, &Stamped { generated_at, record })?;
                    writeln!(self.writer)?;
                }
            }
            OutputFormat::Json => {
                let stamped: Vec<Stamped<'_, T>> =
                    records.iter().map(|record| Stamped { generated_at, record }).collect();
                serde_json::to_writer_pretty(&mut self.writer, &stamped)?;
                writeln!(self.writer)?;
            }
        }

        self.writer.flush()?;
        debug!(records = %records.len(), format = %self.format, "report_written");
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
