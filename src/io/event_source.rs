//! Event loading for the grouping command
//!
//! Accepts either a JSON array of events or JSONL (one event per line).
//! Lines that fail to parse in JSONL mode are skipped with a warning so one
//! bad record does not sink a whole export.

use crate::domain::types::EventPoint;
use anyhow::Context;
use std::fs;
use std::io::{self, Read};
use tracing::{debug, warn};

/// Read events from a file path, or stdin when the path is "-"
pub fn read_events(path: &str) -> anyhow::Result<Vec<EventPoint>> {
    let content = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("Failed to read events from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read events file {}", path))?
    };

    let events = parse_events(&content)
        .with_context(|| format!("Failed to parse events from {}", path))?;
    debug!(source = %path, events = %events.len(), "events_loaded");
    Ok(events)
}

/// Parse a JSON array or JSONL document into events
pub fn parse_events(content: &str) -> anyhow::Result<Vec<EventPoint>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let events: Vec<EventPoint> = serde_json::from_str(trimmed)?;
        return Ok(events);
    }

    let mut events = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<EventPoint>(line) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!(line = %(line_no + 1), error = %e, "event_line_skipped");
            }
        }
    }
    Ok(events)
}
